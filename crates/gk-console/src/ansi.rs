//! ANSI colour handling for server log lines.
//!
//! Game servers colour their console output with SGR escape sequences
//! (`ESC[31m`). Some transports lose the escape byte and leave bare `[31m`
//! remnants. Both forms are handled.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// SGR sequence with the escape byte.
static ESCAPED_SGR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[\d+(?:;\d+)*m").unwrap());

/// SGR remnant without the escape byte.
static BARE_SGR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+(?:;\d+)*m").unwrap());

/// Either form, capturing the parameter list.
static ANY_SGR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b?\[(\d+(?:;\d+)*)m").unwrap());

/// How the log view treats colour codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnsiMode {
    /// Remove colour codes, keep plain text.
    #[default]
    Strip,
    /// Convert colour codes to `<span style="color:...">` markup. Text is HTML-escaped.
    Markup,
}

impl AnsiMode {
    pub fn apply(&self, line: &str) -> String {
        match self {
            Self::Strip => strip(line),
            Self::Markup => markup(line),
        }
    }
}

/// Remove escaped sequences first, then bare remnants.
pub fn strip(line: &str) -> String {
    let without_escaped = ESCAPED_SGR.replace_all(line, "");
    BARE_SGR.replace_all(&without_escaped, "").into_owned()
}

/// Render colour codes as inline spans.
pub fn markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut open = false;
    let mut last = 0;

    for caps in ANY_SGR.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        push_escaped(&mut out, &line[last..whole.start()]);
        last = whole.end();

        let params = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        for code in params.split(';').filter_map(|p| p.parse::<u8>().ok()) {
            if code == 0 || code == 39 {
                if open {
                    out.push_str("</span>");
                    open = false;
                }
            } else if let Some(color) = color_for(code) {
                if open {
                    out.push_str("</span>");
                }
                out.push_str("<span style=\"color:");
                out.push_str(color);
                out.push_str("\">");
                open = true;
            }
        }
    }

    push_escaped(&mut out, &line[last..]);
    if open {
        out.push_str("</span>");
    }
    out
}

fn color_for(code: u8) -> Option<&'static str> {
    let color = match code {
        30 => "#000000",
        31 => "#cd3131",
        32 => "#0dbc79",
        33 => "#e5e510",
        34 => "#2472c8",
        35 => "#bc3fbc",
        36 => "#11a8cd",
        37 => "#e5e5e5",
        90 => "#666666",
        91 => "#f14c4c",
        92 => "#23d18b",
        93 => "#f5f543",
        94 => "#3b8eea",
        95 => "#d670d6",
        96 => "#29b8db",
        97 => "#ffffff",
        _ => return None,
    };
    Some(color)
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
