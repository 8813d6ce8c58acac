use super::read_source;
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    lines: usize,
    words: usize,
    chars: usize,
}

impl Counts {
    fn of(content: &str) -> Self {
        Self {
            lines: content.matches('\n').count(),
            words: content.split_whitespace().count(),
            chars: content.chars().count(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.chars += other.chars;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Selection {
    lines: bool,
    words: bool,
    chars: bool,
}

impl Selection {
    fn format(&self, counts: Counts) -> String {
        let mut fields = Vec::new();
        if self.lines {
            fields.push(counts.lines.to_string());
        }
        if self.words {
            fields.push(counts.words.to_string());
        }
        if self.chars {
            fields.push(counts.chars.to_string());
        }
        fields.join(" ")
    }
}

/// `wc [-l] [-w] [-m] [FILE...]`
///
/// With no flags all three counts are shown. Several files get one line
/// each plus a `total` line.
pub fn builtin_wc(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let mut selection = Selection::default();
    let mut files = Vec::new();
    for arg in args {
        if arg.starts_with('-') && arg.len() > 1 {
            for ch in arg[1..].chars() {
                match ch {
                    'l' => selection.lines = true,
                    'w' => selection.words = true,
                    'm' => selection.chars = true,
                    _ => return Err(ShellError::app("wc", format!("invalid option -- '{}'", ch))),
                }
            }
        } else {
            files.push(arg.as_str());
        }
    }
    if !(selection.lines || selection.words || selection.chars) {
        selection = Selection {
            lines: true,
            words: true,
            chars: true,
        };
    }

    if files.is_empty() {
        let content = read_source("wc", None, runtime, input)?;
        writeln!(output, "{}", selection.format(Counts::of(&content)))?;
        return Ok(());
    }

    let mut total = Counts::default();
    for &file in &files {
        let counts = Counts::of(&read_source("wc", Some(file), runtime, input)?);
        total.add(counts);
        writeln!(output, "{} {}", selection.format(counts), file)?;
    }
    if files.len() > 1 {
        writeln!(output, "{} total", selection.format(total))?;
    }
    Ok(())
}
