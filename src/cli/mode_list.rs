use std::io::{self, Write};

use crate::core::modes::Mode;

const HEADERS: [&str; 5] = ["MODE", "METHOD", "PATH", "AGENT", "SCHEMA"];

pub fn list_modes(default_mode: Mode) -> io::Result<()> {
    let stdout = io::stdout();
    write_modes(&mut stdout.lock(), default_mode)
}

/// Registry table; the starting mode is starred.
pub fn write_modes<W: Write>(out: &mut W, default_mode: Mode) -> io::Result<()> {
    let rows: Vec<[String; 5]> = Mode::ALL
        .iter()
        .map(|mode| {
            let descriptor = mode.descriptor();
            let name = if *mode == default_mode {
                format!("{mode}*")
            } else {
                mode.to_string()
            };
            [
                name,
                descriptor.http_method.to_string(),
                descriptor.endpoint_path.to_string(),
                descriptor.agent_label.to_string(),
                descriptor.response_schema.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS.map(str::to_string), &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    writeln!(out)?;
    writeln!(out, "* = starting mode")
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 5], widths: &[usize; 5]) -> io::Result<()> {
    let [leading @ .., last] = cells;
    for (cell, width) in leading.iter().zip(widths.iter().copied()) {
        write!(out, "{cell:<width$}  ")?;
    }
    writeln!(out, "{last}")
}
