//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod mode_list;
pub mod say;
pub mod status;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use clap::{Parser, Subcommand};

use crate::api::HttpAgentBackend;
use crate::cli::mode_list::list_modes;
use crate::cli::say::run_say;
use crate::cli::status::show_status;
use crate::core::config::data::path_display;
use crate::core::config::{Config, ConfigKey};
use crate::core::conversation::ConversationController;
use crate::core::modes::Mode;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LoggingState, TraceTarget};

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    let or_unknown = |value: Option<&'static str>| value.unwrap_or("unknown");
    format!(
        "{}\ncommit: {} ({})\nbranch: {}\ncommitted: {}\nbuilt: {}\nrustc: {}",
        env!("CARGO_PKG_VERSION"),
        or_unknown(option_env!("VERGEN_GIT_DESCRIBE")),
        or_unknown(option_env!("VERGEN_GIT_SHA")),
        or_unknown(option_env!("VERGEN_GIT_BRANCH")),
        or_unknown(option_env!("VERGEN_GIT_COMMIT_TIMESTAMP")),
        or_unknown(option_env!("VERGEN_BUILD_TIMESTAMP")),
        or_unknown(option_env!("VERGEN_RUSTC_SEMVER")),
    )
});

#[derive(Parser)]
#[command(name = "novahub", version, long_version = LONG_VERSION.as_str())]
#[command(about = "A terminal client for the Cloudnova multi-agent backend")]
#[command(
    long_about = "novahub forwards your messages to one of four agents (weather chat, entity \
extraction, sentiment analysis, document Q&A) and shows their structured replies.\n\n\
Environment Variables:\n\
  NOVAHUB_API_URL   Backend base URL (defaults to http://127.0.0.1:8000)\n\
  NOVAHUB_LOG       Tracing filter, e.g. debug or novahub=trace (defaults to warn)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab/Shift+Tab     Switch agent\n\
  F2                Toggle the Under the Hood panel\n\
  Up/Down/PgUp/PgDn Scroll the conversation\n\
  Esc/Ctrl+C        Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides NOVAHUB_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Agent mode: chat, extract, analyze or document-qa
    #[arg(short = 'm', long, global = true, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Append the conversation transcript to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic tracing to the specified file
    #[arg(long, global = true, value_name = "PATH")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// List agent modes and their endpoints
    Modes,
    /// Check whether the backend is online
    Status,
    /// Show the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        api_url,
        mode,
        log,
        trace_file,
    } = args;
    let command = command.unwrap_or(Commands::Chat);

    // The chat screen owns the terminal, so it only traces into a file.
    let target = match (&command, trace_file.as_deref()) {
        (_, Some(path)) => TraceTarget::File(path),
        (Commands::Chat, None) => TraceTarget::Disabled,
        (_, None) => TraceTarget::Stderr,
    };
    init_tracing(target)?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let (controller, base_url) =
                build_controller(&config, api_url.as_deref(), mode, log)?;
            run_chat(controller, base_url).await
        }
        Commands::Say { text } => {
            let config = Config::load()?;
            let (controller, _) = build_controller(&config, api_url.as_deref(), mode, log)?;
            run_say(controller, text).await
        }
        Commands::Modes => {
            let config = Config::load()?;
            list_modes(config.resolve_mode(mode))?;
            Ok(())
        }
        Commands::Status => {
            let config = Config::load()?;
            let base_url = config.api_url_for(api_url.as_deref());
            let backend = HttpAgentBackend::new(base_url.clone());
            show_status(&backend, &base_url).await
        }
        Commands::Config => {
            let config_path = Config::get_config_path()?;
            let config = Config::load_from_path(&config_path)?;
            println!("Config file: {}", path_display(&config_path));
            config.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            let config_path = Config::get_config_path()?;
            if value.is_empty() {
                Config::load_from_path(&config_path)?.print_all();
                return Ok(());
            }
            match set_config_value(&config_path, &key, &value.join(" ")) {
                Ok(message) => {
                    println!("✅ {message}");
                    Ok(())
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Unset { key } => {
            let config_path = Config::get_config_path()?;
            match unset_config_value(&config_path, &key) {
                Ok(message) => {
                    println!("✅ {message}");
                    Ok(())
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Wire the HTTP backend, session identity and transcript into a controller.
/// Returns the controller and the resolved base URL.
pub fn build_controller(
    config: &Config,
    api_url: Option<&str>,
    mode: Option<Mode>,
    log: Option<String>,
) -> Result<(ConversationController, String), Box<dyn Error>> {
    let base_url = config.api_url_for(api_url);
    let backend = Arc::new(HttpAgentBackend::new(base_url.clone()));
    let transcript = LoggingState::new(log)?;
    let controller = ConversationController::with_transcript(
        backend,
        config.identity(),
        config.resolve_mode(mode),
        transcript,
    );
    Ok((controller, base_url))
}

pub fn set_config_value(
    config_path: &Path,
    key: &str,
    value: &str,
) -> Result<String, Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    let mut config = Config::load_from_path(config_path)?;
    config.set(key, value)?;
    config.save_to_path(config_path)?;
    Ok(format!("Set {key} to: {}", value.trim()))
}

pub fn unset_config_value(config_path: &Path, key: &str) -> Result<String, Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    let mut config = Config::load_from_path(config_path)?;
    if !config.unset(key) {
        return Ok(format!("{key} was not set"));
    }
    config.save_to_path(config_path)?;
    Ok(format!("Unset {key}"))
}

#[cfg(test)]
mod tests;
