mod explain_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::debug;

use texplain_config::{config_dir, config_file_path, TexplainConfig};
use texplain_core::{ProviderKind, TexplainError};

use explain_cmd::{ExplainOptions, OutputMode};

#[derive(Parser, Debug)]
#[command(name = "texplain")]
#[command(about = "Recognize an equation image with pix2tex and ask an LLM to explain it")]
#[command(version)]
struct Cli {
    /// Path to the equation image
    #[arg(required_unless_present = "print_config")]
    image: Option<PathBuf>,

    /// Model identifier sent to the provider
    #[arg(long)]
    model: Option<String>,

    /// Completion token ceiling
    #[arg(long)]
    max_tokens: Option<u32>,

    /// LLM backend: cerebras, openrouter, or ollama
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// OCR binary to run instead of `pix2tex`
    #[arg(long)]
    ocr_bin: Option<String>,

    /// Config file (defaults to ~/.texplain/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after printing the LaTeX
    #[arg(long)]
    latex_only: bool,

    /// Print the result as JSON instead of progress text
    #[arg(long)]
    json: bool,

    /// Print the effective config with secrets masked, then exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply_overrides(&self, config: &mut TexplainConfig) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(provider) = self.provider {
            config.llm.provider = provider;
        }
        if let Some(bin) = &self.ocr_bin {
            config.ocr.bin = bin.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let mut config = texplain_config::load_and_prepare(&config_path).await?;
    cli.apply_overrides(&mut config);

    let level = texplain_logging::level_for_verbosity(&config.logging.level, cli.verbose);
    texplain_logging::init_logger(&level, config.logging.dir.as_deref());
    debug!(path = %config_path.display(), "Config loaded");

    texplain_config::ensure_valid(&config)?;

    // clap guarantees an image unless --print-config was given.
    let Some(image) = cli.image.filter(|_| !cli.print_config) else {
        let view = texplain_config::redacted_view(&config)?;
        print!("{}", serde_yaml::to_string(&view)?);
        return Ok(());
    };

    let options = ExplainOptions {
        image,
        latex_only: cli.latex_only,
        mode: if cli.json { OutputMode::Json } else { OutputMode::Text },
    };
    explain_cmd::run(options, &config).await
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<TexplainError>() {
        Some(TexplainError::OcrFailed { stderr, .. }) => {
            terminal_output::note_error(&format!("Error converting image to LaTeX: {stderr}"));
        }
        Some(e) if e.is_ocr_failure() => {
            terminal_output::note_error(&format!("Error converting image to LaTeX: {e}"));
        }
        _ => terminal_output::note_error(&format!("Error: {err:#}")),
    }
}
