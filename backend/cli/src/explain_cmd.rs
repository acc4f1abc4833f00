//! The explain pipeline: recognize, print the LaTeX, ask the model, print the answer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use texplain_config::TexplainConfig;
use texplain_core::{FormulaRecognizer, LlmResponse, TexplainError};
use texplain_explainer::{build_provider, ExplainSettings, Explainer, ProviderSettings};
use texplain_understanding::Pix2TexRecognizer;

use crate::terminal_output::{self, progress, section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ExplainOptions {
    pub image: PathBuf,
    pub latex_only: bool,
    pub mode: OutputMode,
}

/// What one pipeline run produced.
#[derive(Debug, Serialize)]
pub struct ExplainOutcome {
    pub image: PathBuf,
    pub latex: String,
    pub explanation: Option<LlmResponse>,
}

/// The explanation step plus the name shown while it runs.
pub struct ExplainStep<'a> {
    pub explainer: &'a Explainer,
    pub label: &'a str,
}

/// Wire the configured recognizer and provider, then run the pipeline on stdout.
pub async fn run(options: ExplainOptions, config: &TexplainConfig) -> Result<()> {
    if !options.image.exists() {
        return Err(TexplainError::ImageNotFound(options.image).into());
    }

    let recognizer = Pix2TexRecognizer::new()
        .with_bin(config.ocr.bin.clone())
        .with_extra_args(config.ocr.args.clone())
        .with_timeout(config.ocr.timeout());

    // Built before OCR so a missing key fails fast.
    let explainer = if options.latex_only {
        None
    } else {
        let provider = build_provider(&ProviderSettings {
            kind: config.llm.provider,
            api_key: config.llm.resolved_api_key(),
            base_url: config.llm.base_url.clone(),
            request_timeout: config.llm.request_timeout(),
        })?;
        Some(Explainer::new(
            provider,
            ExplainSettings {
                model: config.llm.model.clone(),
                max_tokens: config.llm.max_tokens,
                system_prompt: config.llm.system_prompt.clone(),
                temperature: config.llm.temperature,
            },
        ))
    };
    let step = explainer.as_ref().map(|explainer| ExplainStep {
        explainer,
        label: config.llm.provider.display_name(),
    });

    let mut out = std::io::stdout();
    let outcome = run_pipeline(&options.image, &recognizer, step, options.mode, &mut out).await?;

    if outcome.latex.is_empty() && options.mode == OutputMode::Text {
        terminal_output::note_warn("the OCR tool returned no LaTeX");
    }
    Ok(())
}

/// Run recognition and, when `step` is given, one explanation request.
///
/// In text mode progress is written as each step starts; in JSON mode a
/// single object is written at the end.
pub async fn run_pipeline(
    image: &Path,
    recognizer: &dyn FormulaRecognizer,
    step: Option<ExplainStep<'_>>,
    mode: OutputMode,
    out: &mut impl Write,
) -> Result<ExplainOutcome> {
    let text = mode == OutputMode::Text;

    if text {
        progress(out, "📄 Converting image to LaTeX...")?;
        out.flush()?;
    }
    let latex = recognizer.recognize(image).await?;
    info!(recognizer = %recognizer.name(), chars = latex.len(), "Formula recognized");
    if text {
        section(out, "📄 LaTeX Output:", &latex)?;
    }

    let explanation = match step {
        Some(step) => {
            if text {
                progress(out, &format!("\n🤖 Asking {} for an explanation...", step.label))?;
                out.flush()?;
            }
            let response = step.explainer.explain(&latex).await?;
            if text {
                section(out, "🤖 Explanation:", &response.content)?;
            }
            Some(response)
        }
        None => None,
    };

    let outcome = ExplainOutcome {
        image: image.to_path_buf(),
        latex,
        explanation,
    };

    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *out, &outcome).context("Failed to write JSON result")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use texplain_explainer::providers::mock::MockProvider;
    use texplain_understanding::parse_latex_output;

    /// Replays fixed tool output, or fails like a non-zero exit.
    struct StubRecognizer {
        stdout: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl FormulaRecognizer for StubRecognizer {
        fn name(&self) -> &str {
            "stub"
        }

        async fn recognize(&self, _image: &Path) -> Result<String> {
            match self.stdout {
                Ok(stdout) => Ok(parse_latex_output(stdout)),
                Err(stderr) => Err(TexplainError::OcrFailed {
                    code: Some(1),
                    stderr: stderr.to_string(),
                }
                .into()),
            }
        }
    }

    fn explainer(provider: Arc<MockProvider>) -> Explainer {
        Explainer::new(
            provider,
            ExplainSettings {
                model: "qwen-3-235b-a22b-instruct-2507".into(),
                max_tokens: 500,
                system_prompt: String::new(),
                temperature: None,
            },
        )
    }

    #[tokio::test]
    async fn test_prints_latex_then_explanation() {
        let provider = Arc::new(MockProvider::new("mock").with_response("This is a quadratic term."));
        let explainer = explainer(provider.clone());
        let recognizer = StubRecognizer { stdout: Ok("sum.png: x^2\n") };
        let mut out = Vec::new();

        let outcome = run_pipeline(
            Path::new("sum.png"),
            &recognizer,
            Some(ExplainStep { explainer: &explainer, label: "Cerebras" }),
            OutputMode::Text,
            &mut out,
        )
        .await
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            "📄 Converting image to LaTeX...\n\
             \n📄 LaTeX Output:\n\nx^2\n\
             \n🤖 Asking Cerebras for an explanation...\n\
             \n🤖 Explanation:\n\nThis is a quadratic term.\n"
        );
        assert_eq!(outcome.latex, "x^2");
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            provider.last_request().unwrap().user_prompt,
            "Explain this equation to me:\n\nx^2"
        );
    }

    #[tokio::test]
    async fn test_ocr_failure_skips_explanation() {
        let provider = Arc::new(MockProvider::new("mock").with_response("unused"));
        let explainer = explainer(provider.clone());
        let recognizer = StubRecognizer { stdout: Err("cannot open image") };
        let mut out = Vec::new();

        let err = run_pipeline(
            Path::new("missing.png"),
            &recognizer,
            Some(ExplainStep { explainer: &explainer, label: "Cerebras" }),
            OutputMode::Text,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TexplainError>(),
            Some(TexplainError::OcrFailed { .. })
        ));
        assert_eq!(provider.calls(), 0);
        let printed = String::from_utf8(out).unwrap();
        assert!(!printed.contains("Asking"));
    }

    #[tokio::test]
    async fn test_latex_only_makes_no_request() {
        let recognizer = StubRecognizer { stdout: Ok("\\frac{a}{b}") };
        let mut out = Vec::new();

        let outcome = run_pipeline(Path::new("f.png"), &recognizer, None, OutputMode::Text, &mut out)
            .await
            .unwrap();

        assert!(outcome.explanation.is_none());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.ends_with("\\frac{a}{b}\n"));
        assert!(!printed.contains("🤖"));
    }

    #[tokio::test]
    async fn test_json_mode_writes_single_object() {
        let provider = Arc::new(MockProvider::new("mock").with_response("This is a quadratic term."));
        let explainer = explainer(provider);
        let recognizer = StubRecognizer { stdout: Ok("x^2") };
        let mut out = Vec::new();

        run_pipeline(
            Path::new("sum.png"),
            &recognizer,
            Some(ExplainStep { explainer: &explainer, label: "Cerebras" }),
            OutputMode::Json,
            &mut out,
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["image"], "sum.png");
        assert_eq!(value["latex"], "x^2");
        assert_eq!(value["explanation"]["content"], "This is a quadratic term.");
        assert_eq!(value["explanation"]["provider"], "mock");
    }
}
