use std::io::{self, Write};

use crate::core::config::data::{Config, ConfigKey, API_URL_ENV, DEFAULT_API_URL};

impl Config {
    pub fn print_all(&self) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        // Printing to a closed stdout is not worth failing the command over.
        let _ = self.write_all(&mut out);
    }

    pub fn write_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Current configuration:")?;
        for key in ConfigKey::ALL {
            let (value, fallback) = match key {
                ConfigKey::ApiUrl => (self.api_url.clone(), DEFAULT_API_URL.to_string()),
                ConfigKey::ThreadId => (
                    self.thread_id.clone(),
                    self.identity().thread_id,
                ),
                ConfigKey::UserId => (self.user_id.clone(), self.identity().user_id),
                ConfigKey::DefaultMode => (
                    self.default_mode.map(|mode| mode.to_string()),
                    self.resolve_mode(None).to_string(),
                ),
            };
            match value {
                Some(value) => writeln!(out, "  {key}: {value}")?,
                None => writeln!(out, "  {key}: (unset, using {fallback})")?,
            }
        }
        if let Ok(env_url) = std::env::var(API_URL_ENV) {
            writeln!(out, "  {API_URL_ENV} overrides api-url: {env_url}")?;
        }
        Ok(())
    }
}
