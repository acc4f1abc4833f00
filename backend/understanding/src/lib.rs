pub mod ocr;

pub use ocr::{parse_latex_output, Pix2TexRecognizer};
