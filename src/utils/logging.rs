//! Session transcript logging and diagnostic tracing setup.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::message::Message;
use crate::core::projection::highlights_for;

/// Environment variable holding the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "NOVAHUB_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Where diagnostic output goes.
pub enum TraceTarget<'a> {
    Stderr,
    File(&'a Path),
    /// The terminal belongs to the UI and no file was requested.
    Disabled,
}

/// Install the global tracing subscriber. Safe to call once per process;
/// later calls are ignored.
pub fn init_tracing(target: TraceTarget<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = match target {
        TraceTarget::Disabled => return Ok(()),
        TraceTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        TraceTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    // A subscriber installed earlier (tests, embedding) wins.
    let _ = installed;
    Ok(())
}

/// Appends the conversation to a plain-text file as it happens.
pub struct LoggingState {
    file_path: Option<String>,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }
        Ok(LoggingState {
            file_path: log_file,
        })
    }

    pub fn disabled() -> Self {
        LoggingState { file_path: None }
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);
        write_entry(&mut writer, message)?;
        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match &self.file_path {
            None => "off".to_string(),
            Some(path) => Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        }
    }
}

fn write_entry<W: Write>(writer: &mut W, message: &Message) -> std::io::Result<()> {
    let speaker = if message.is_user() {
        "You"
    } else {
        message.mode().descriptor().agent_label
    };
    let stamp = message.created_at().format("%Y-%m-%d %H:%M:%S UTC");
    let header = format!("[{stamp}] {speaker} ({}):", message.mode());
    writeln!(writer, "{header}")?;

    for line in message.content().lines() {
        writeln!(writer, "{line}")?;
    }
    if message.is_assistant() {
        for highlight in highlights_for(message.mode(), message.metadata()) {
            writeln!(writer, "  • {highlight}")?;
        }
    }

    // Blank line between entries, matching the on-screen spacing.
    writeln!(writer)
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
