//! Text and JSON rendering for command results.

use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Prints either pretty JSON or human-readable text.
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON when `--json` is set, otherwise run `text`.
    pub fn emit<T, F>(&self, value: &T, text: F) -> CmdResult
    where
        T: Serialize,
        F: FnOnce(),
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    /// Plain confirmation; `{"ok": true, ...}` in JSON mode.
    pub fn done(&self, message: &str) -> CmdResult {
        self.emit(&serde_json::json!({"ok": true, "message": message}), || {
            println!("{}", message)
        })
    }
}

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().map(|h| h.to_string()).collect()));
    out.push(line(headers.iter().map(|h| "-".repeat(h.chars().count())).collect()));
    for row in rows {
        out.push(line(row.clone()));
    }
    out.join("\n")
}

pub fn render_key_values(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}", format!("{}:", k), v, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        return s;
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
