//! Usage text. Nothing here makes parsing decisions, it only lays out what
//! the tree exposes.
use std::fmt::Write;

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

use crate::node::Node;

const WIDTH: usize = 96;
const INDENT: usize = 4;
const MIN_COLUMN: usize = 16;
const GAP: usize = 2;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

/// Colors for the roles used in usage text and error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// When unset, text is emitted without escape codes.
    pub enabled: bool,
    pub info: Color,
    pub important: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            enabled: true,
            info: Color::White,
            important: Color::BrightYellow,
            error: Color::BrightRed,
        }
    }
}

impl Palette {
    pub fn plain() -> Palette {
        Palette { enabled: false, ..Palette::default() }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, self.info)
    }

    pub fn important(&self, text: &str) -> String {
        self.paint(text, self.important)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, self.error)
    }
}

pub(crate) fn render(node: &Node, palette: &Palette) -> String {
    let mut buf = String::new();

    w!(buf, "{}", palette.info("Usage: "));
    if node.is_command() {
        w!(buf, "{} [OPTIONS]", node.trigger());
        for arg in node.arguments() {
            w!(buf, " {}", arg);
        }
        w!(buf, "\n");
    } else {
        w!(buf, "{} [OPTIONS] <COMMAND> [ARGS]...\n", node.trigger());
    }
    if !node.description().is_empty() {
        w!(buf, "\n{}\n", palette.important(node.description()));
    }

    let options =
        node.options().map(|opt| (opt.trigger(), opt.description())).collect::<Vec<_>>();
    if !options.is_empty() {
        w!(buf, "\n{}\n", palette.info("Options:"));
        table(&mut buf, &options);
    }

    let commands = node
        .groups()
        .chain(node.commands())
        .map(|it| (it.trigger().to_string(), it.description().to_string()))
        .collect::<Vec<_>>();
    if !commands.is_empty() {
        w!(buf, "\n{}\n", palette.info("Commands:"));
        table(&mut buf, &commands);
    }

    buf
}

pub(crate) fn version(version: &str, palette: &Palette) -> String {
    format!("version: {}\n", palette.info(version))
}

/// Two columns, the right one wrapped at word boundaries.
fn table(buf: &mut String, rows: &[(String, String)]) {
    let left = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0).max(MIN_COLUMN);
    let right = WIDTH.saturating_sub(INDENT + left + GAP).max(MIN_COLUMN);

    for (l, r) in rows {
        let mut lines = wrap(r, right).into_iter();
        let first = lines.next().unwrap_or_default();
        let pad = left - l.width() + GAP;
        let line = format!("{:indent$}{}{:pad$}{}", "", l, "", first, indent = INDENT, pad = pad);
        w!(buf, "{}\n", line.trim_end());
        for line in lines {
            w!(buf, "{:indent$}{}\n", "", line, indent = INDENT + left + GAP);
        }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
