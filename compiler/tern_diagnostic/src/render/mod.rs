//! Terminal rendering of messages against a source map.
//!
//! Plain output:
//!
//! ```text
//! [error] Expected type 'Int', but got 'String'
//! in 'main.tn'
//!  1   val x: Int = "oops"
//!                   ^^^^^^
//! note: ...
//! ```

use tern_ir::{SourceMap, Span};

use crate::span_utils::LineOffsetTable;
use crate::{Message, Section};

/// Color output mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

mod style {
    pub const RESET: &str = "\x1B[0m";
    pub const BLACK: &str = "\x1B[30m";
    pub const WHITE: &str = "\x1B[37m";
    pub const GRAY: &str = "\x1B[90m";
    pub const RED: &str = "\x1B[91m";
    pub const YELLOW: &str = "\x1B[93m";
    pub const BG_RED: &str = "\x1B[101m";
    pub const BG_YELLOW: &str = "\x1B[103m";
}

/// Render a message, re-reading source text for every `Code` section.
pub fn render(message: &Message, sources: &SourceMap, colored: bool) -> String {
    let mut out = String::new();
    for section in message.sections() {
        if !out.is_empty() {
            out.push('\n');
        }
        match section {
            Section::Error(text) if colored => {
                out.push_str(&format!(
                    "{}{} error {} {}{text}{}",
                    style::BG_RED,
                    style::BLACK,
                    style::RESET,
                    style::RED,
                    style::RESET
                ));
            }
            Section::Error(text) => out.push_str(&format!("[error] {text}")),
            Section::Warning(text) if colored => {
                out.push_str(&format!(
                    "{}{} warning {} {}{text}{}",
                    style::BG_YELLOW,
                    style::BLACK,
                    style::RESET,
                    style::YELLOW,
                    style::RESET
                ));
            }
            Section::Warning(text) => out.push_str(&format!("<warning> {text}")),
            Section::Note(text) if colored => out.push_str(text),
            Section::Note(text) => out.push_str(&format!("note: {text}")),
            Section::Code(span) => render_code(&mut out, *span, sources, colored),
        }
    }
    out
}

fn render_code(out: &mut String, span: Span, sources: &SourceMap, colored: bool) {
    if colored {
        out.push_str(style::GRAY);
    }
    let Some(file) = sources.get(span.file) else {
        out.push_str("in '<unknown>'");
        if colored {
            out.push_str(style::RESET);
        }
        return;
    };
    out.push_str(&format!("in '{}'", file.path));

    let text = file.text.as_str();
    let table = LineOffsetTable::build(text);
    let (start_line, start_col) = table.offset_to_line_col(text, span.start);
    let last = span.end.max(span.start + 1) - 1;
    let (end_line, end_col) = table.offset_to_line_col(text, last);
    let width = end_line.to_string().len();

    for line in start_line..=end_line {
        let Some(line_text) = table.line_text(text, line) else {
            break;
        };
        let mut display = String::new();
        let mut marker = String::new();
        let mut was_marked = false;
        for (i, ch) in line_text.chars().enumerate() {
            let col = u32::try_from(i).unwrap_or(u32::MAX - 1) + 1;
            let marked = (line != start_line || col >= start_col)
                && (line != end_line || col <= end_col);
            if colored && marked && !was_marked {
                display.push_str(style::WHITE);
            }
            if colored && !marked && was_marked {
                display.push_str(style::GRAY);
            }
            display.push(ch);
            marker.push(if marked { '^' } else { ' ' });
            was_marked = marked;
        }
        if colored && was_marked {
            display.push_str(style::GRAY);
        }
        out.push_str(&format!("\n {line:>width$}   {display}"));
        out.push_str(&format!("\n {:width$}   {}", "", marker.trim_end()));
    }
    if colored {
        out.push_str(style::RESET);
    }
}

impl Message {
    /// Render against the given sources. See [`render`].
    pub fn render(&self, sources: &SourceMap, colored: bool) -> String {
        render(self, sources, colored)
    }
}
