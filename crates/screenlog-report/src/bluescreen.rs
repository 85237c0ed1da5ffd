//! Default HTML renderer
//!
//! Produces a single self-contained HTML page per error: a header with the
//! outermost error, then one section per link of the cause chain with its
//! location and stack trace.

use std::io::{self, Write};

use chrono::Local;
use screenlog_core::domain::ErrorValue;
use screenlog_core::ports::IErrorRenderer;

use crate::message::format_link;

const STYLE: &str = "body{margin:0;font:14px/1.5 Verdana,sans-serif;background:#fff;color:#333}\
#screen header{background:#1e3a8a;color:#fff;padding:24px 32px}\
#screen h1{margin:0;font-size:22px;font-weight:normal}\
#screen .message{font-size:18px;margin:8px 0 0}\
#screen section{padding:16px 32px;border-bottom:1px solid #ddd}\
#screen .location{font-family:monospace;color:#555}\
#screen ol.trace{font-family:monospace;font-size:12px}\
#screen footer{padding:16px 32px;color:#999;font-size:12px}";

/// Renders error values as standalone HTML pages
#[derive(Debug, Clone)]
pub struct BlueScreenRenderer {
    max_depth: usize,
}

impl BlueScreenRenderer {
    /// Creates a renderer showing at most `max_depth` chain links.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }
}

impl Default for BlueScreenRenderer {
    fn default() -> Self {
        Self::new(screenlog_core::domain::error_value::MAX_CHAIN_DEPTH)
    }
}

impl IErrorRenderer for BlueScreenRenderer {
    fn render(&self, error: &ErrorValue, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<meta name=\"robots\" content=\"noindex\">")?;
        writeln!(
            out,
            "<title>{}: {}</title>",
            escape_html(error.label()),
            escape_html(error.message())
        )?;
        writeln!(out, "<style>{STYLE}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<div id=\"screen\">")?;

        writeln!(out, "<header>")?;
        writeln!(out, "<h1>{}</h1>", escape_html(error.label()))?;
        writeln!(out, "<p class=\"message\">{}</p>", escape_html(error.message()))?;
        writeln!(out, "</header>")?;

        for (depth, link) in error.chain().take(self.max_depth).enumerate() {
            write_link(out, depth, link)?;
        }

        writeln!(
            out,
            "<footer>Report generated {}</footer>",
            Local::now().format("%Y-%m-%d %H:%M:%S %z")
        )?;
        writeln!(out, "</div>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(())
    }
}

fn write_link(out: &mut dyn Write, depth: usize, link: &ErrorValue) -> io::Result<()> {
    let class = if depth == 0 { "exception" } else { "previous" };
    writeln!(out, "<section class=\"{class}\">")?;
    if depth > 0 {
        writeln!(out, "<h2>Caused by</h2>")?;
    }
    writeln!(out, "<p>{}</p>", escape_html(&format_link(link)))?;
    writeln!(
        out,
        "<p class=\"location\">{}:{}</p>",
        escape_html(link.file()),
        link.line()
    )?;
    if let Some(code) = link.system_code() {
        writeln!(
            out,
            "<p class=\"code\">{} (code {})</p>",
            escape_html(code.name()),
            code.code()
        )?;
    }
    if !link.trace().is_empty() {
        writeln!(out, "<ol class=\"trace\" start=\"0\">")?;
        for frame in link.trace() {
            writeln!(out, "<li>{}</li>", escape_html(frame))?;
        }
        writeln!(out, "</ol>")?;
    }
    writeln!(out, "</section>")
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
