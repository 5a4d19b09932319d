//! Command-line interface parsing and handling
//!
//! This module parses arguments, resolves the effective settings from the
//! config file and flags, and dispatches to the TUI or the one-shot commands.

pub mod say;


use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::app::App;
use crate::core::backend::{ChatBackend, HttpBackend};
use crate::core::config::{parse_theme, path_display, Config};
use crate::core::constants::SYSTEM_PROMPT;
use crate::core::session::ChatSession;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::init_file_logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ")"
);

/// Exit code for a missing API key.
const EXIT_NO_API_KEY: i32 = 2;

#[derive(Parser)]
#[command(name = "analista")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A Fourth Way self-observation guide in your terminal")]
#[command(
    long_about = "Analista walks you through a scripted self-observation dialogue. \
The model answers with short questions and numbered or lettered options; pick one \
with the mouse or Tab, or type your own answer.\n\n\
Environment Variables:\n\
  API_KEY           API key (GEMINI_API_KEY and OPENAI_API_KEY are also checked)\n\
  ANALISTA_LOG      Log filter for --log-file (default: info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab               Choose an option (Tab/Up/Down to move, Enter to answer, Esc to go back)\n\
  Up/Down/Mouse     Scroll the conversation\n\
  Click             Answer with the clicked option\n\
  Ctrl+T            Toggle dark/light theme\n\
  Ctrl+N            Start over\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this session
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Color theme (dark or light)
    #[arg(long, global = true, value_name = "THEME", value_parser = parse_theme)]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive diagnostic (default)
    Chat,
    /// Send one message without the TUI and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show the effective configuration
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key (base-url, model, temperature, api-key-env, theme, connect-timeout-secs)
        key: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// Everything needed to talk to the model, after flags override config.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub theme: String,
    pub connect_timeout: Option<std::time::Duration>,
    pub api_key: Option<String>,
    /// Variables the API key was looked up in, for error hints.
    pub api_key_envs: Vec<String>,
}

impl Settings {
    pub fn resolve<F>(args: &Args, config: &Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: args
                .base_url
                .clone()
                .unwrap_or_else(|| config.base_url_or_default().to_string()),
            model: args
                .model
                .clone()
                .unwrap_or_else(|| config.model_or_default().to_string()),
            temperature: config.temperature_or_default(),
            theme: args
                .theme
                .clone()
                .unwrap_or_else(|| config.theme_or_default().to_string()),
            connect_timeout: config.connect_timeout(),
            api_key: config.resolve_api_key(lookup),
            api_key_envs: config.api_key_envs().into_iter().map(String::from).collect(),
        }
    }

    /// `model · host`, shown under the title.
    pub fn provider_label(&self) -> String {
        let host = reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.base_url.clone());
        format!("{} · {}", self.model, host)
    }

    pub fn session(&self) -> ChatSession {
        ChatSession::new(SYSTEM_PROMPT, self.model.clone(), self.temperature)
    }

    /// Build the HTTP backend, or exit with a hint when no key is configured.
    pub fn backend(&self) -> Result<HttpBackend, Box<dyn Error>> {
        let Some(api_key) = self.api_key.as_deref() else {
            eprintln!("❌ No API key found.");
            eprintln!();
            eprintln!("💡 Set one of these environment variables:");
            for name in &self.api_key_envs {
                eprintln!("  • {name}");
            }
            eprintln!("Or choose another variable: analista set api-key-env MY_KEY_VAR");
            std::process::exit(EXIT_NO_API_KEY);
        };
        Ok(HttpBackend::new(
            self.base_url.clone(),
            api_key,
            self.connect_timeout,
        )?)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_file_logging(args.log_file.as_deref())?;

    let command = args.command.clone().unwrap_or(Commands::Chat);
    match command {
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            println!("  file: {}", path_display(Config::config_path()?));
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            if let Err(err) = config.set(&key, &value) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(err) = config.unset(&key) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Say { text } => {
            let config = Config::load()?;
            let settings = Settings::resolve(&args, &config, |name| std::env::var(name).ok());
            say::run_say(text.join(" "), &settings).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            let settings = Settings::resolve(&args, &config, |name| std::env::var(name).ok());
            let backend: Arc<dyn ChatBackend> = Arc::new(settings.backend()?);
            info!(model = %settings.model, base_url = %settings.base_url, "starting chat");

            let app = App::new(
                settings.session(),
                Theme::from_name(&settings.theme),
                settings.provider_label(),
            );
            run_chat(app, backend).await
        }
    }
}
