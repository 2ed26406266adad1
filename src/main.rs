//! Application entry point: Ottoman converter CLI.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging (stderr, so stdout carries only converted text).
//! 3. Load [`AppConfig`] and [`Secrets`] (defaults when missing).
//! 4. Build the [`AppContext`] from config + command-line overrides.
//! 5. Run the selected front end on a single-threaded tokio runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use ottoman_converter::app::{self, chat, command, Overrides};
use ottoman_converter::config::{AppConfig, AppPaths, Secrets};
use ottoman_converter::llm::ModelClient;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "ottoman-converter", version, about = "Convert Turkish text to Ottoman Turkish script")]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalOptions {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key for this session.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model identifier.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature, 0.0 to 1.0.
    #[arg(long, value_parser = parse_temperature, global = true)]
    temperature: Option<f32>,

    /// Skip NFKC normalization of the output.
    #[arg(long, global = true)]
    no_normalize: bool,

    /// Force the NG final glyph (ﯓ) when the input ends with n/ng.
    #[arg(long, global = true)]
    force_ng_final: bool,

    /// Knowledgebase document (.txt, .pdf, .docx).
    #[arg(long, global = true, conflicts_with = "no_kb")]
    kb: Option<PathBuf>,

    /// Do not use any knowledgebase, not even the default one.
    #[arg(long, global = true)]
    no_kb: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert one text (reads stdin when TEXT is omitted).
    Convert { text: Option<String> },
    /// Interactive conversion session.
    Chat,
    /// Write a default settings file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let temperature: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err("temperature must be between 0.0 and 1.0".into())
    }
}

impl GlobalOptions {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            no_normalize: self.no_normalize,
            force_ng_final: self.force_ng_final,
            kb: self.kb.clone(),
            no_kb: self.no_kb,
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // 1. Command line
    let cli = Cli::parse();

    // 2. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = AppPaths::new();
    let settings_file = cli
        .options
        .config
        .clone()
        .unwrap_or_else(|| paths.settings_file.clone());

    let overrides = cli.options.overrides();

    match cli.command {
        Command::InitConfig { force } => init_config(&settings_file, force),
        Command::Convert { text } => {
            let text = command::read_text(text, std::io::stdin().lock())?;
            let ctx = context(&settings_file, &paths, &overrides)?;
            let output = runtime()?.block_on(command::convert_once(&ctx, &text))?;
            println!("{output}");
            Ok(())
        }
        Command::Chat => {
            let ctx = context(&settings_file, &paths, &overrides)?;
            runtime()?.block_on(chat::run(chat::ChatState::new(ctx)))
        }
    }
}

fn context(
    settings_file: &std::path::Path,
    paths: &AppPaths,
    overrides: &Overrides,
) -> Result<app::AppContext<Box<dyn ModelClient>>> {
    // 3. Configuration
    let config = AppConfig::load_from(settings_file)
        .with_context(|| format!("cannot load {}", settings_file.display()))?;
    let secrets = Secrets::load_from(&paths.secrets_file).unwrap_or_else(|e| {
        log::warn!("Failed to load secrets ({e}); ignoring");
        Secrets::default()
    });

    // 4. Conversion context
    Ok(app::build_context(&config, &secrets, overrides))
}

// 5. Single-threaded runtime: one conversion at a time.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

fn init_config(path: &std::path::Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default().save_to(path)?;
    println!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn temperature_range() {
        assert_eq!(parse_temperature("0.25"), Ok(0.25));
        assert!(parse_temperature("1.5").is_err());
        assert!(parse_temperature("warm").is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ottoman-converter",
            "convert",
            "Merhaba",
            "--force-ng-final",
            "--no-kb",
            "--api-key",
            "k",
        ])
        .unwrap();

        let overrides = cli.options.overrides();
        assert!(overrides.force_ng_final);
        assert!(overrides.no_kb);
        assert_eq!(overrides.api_key.as_deref(), Some("k"));
        assert!(matches!(cli.command, Command::Convert { text: Some(t) } if t == "Merhaba"));
    }

    #[test]
    fn kb_conflicts_with_no_kb() {
        let parsed = Cli::try_parse_from(["ottoman-converter", "chat", "--kb", "a.pdf", "--no-kb"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        init_config(&path, false).expect("first write");
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).expect("forced write");
    }
}
