use std::error::Error;
use std::io::{self, Write};

use crate::api::{AgentBackend, ServiceStatus};
use crate::core::modes::Mode;

pub async fn show_status(backend: &dyn AgentBackend, base_url: &str) -> Result<(), Box<dyn Error>> {
    match backend.status().await {
        Ok(status) => {
            let stdout = io::stdout();
            write_status(&mut stdout.lock(), base_url, &status)?;
            if !status.is_online() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Backend at {base_url} is unreachable: {err}");
            std::process::exit(1);
        }
    }
}

/// Agent routes this client uses that the backend did not advertise.
pub fn missing_routes(status: &ServiceStatus) -> Vec<&'static str> {
    if status.endpoints.is_empty() {
        return Vec::new();
    }
    Mode::ALL
        .iter()
        .map(|mode| mode.descriptor().endpoint_path)
        .filter(|path| !status.endpoints.iter().any(|endpoint| endpoint == path))
        .collect()
}

pub fn write_status<W: Write>(
    out: &mut W,
    base_url: &str,
    status: &ServiceStatus,
) -> io::Result<()> {
    let marker = if status.is_online() { "✅" } else { "⚠️ " };
    let state = if status.status.is_empty() {
        "unknown"
    } else {
        status.status.as_str()
    };
    writeln!(out, "{marker} {base_url}: {state}")?;
    if !status.endpoints.is_empty() {
        writeln!(out, "  Endpoints: {}", status.endpoints.join(", "))?;
    }
    if !status.tech_stack.is_empty() {
        writeln!(out, "  Tech stack: {}", status.tech_stack.join(", "))?;
    }
    let missing = missing_routes(status);
    if !missing.is_empty() {
        writeln!(out, "  Missing agent routes: {}", missing.join(", "))?;
    }
    Ok(())
}
