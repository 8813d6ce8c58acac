use super::{read_source, write_lines};
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// `uniq [-i] [FILE]`: drops adjacent duplicate lines. `-i` compares
/// case-insensitively and keeps the first line of each run.
pub fn builtin_uniq(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (ignore_case, file) = match args {
        [] => (false, None),
        [flag] if flag == "-i" => (true, None),
        [flag, file] if flag == "-i" => (true, Some(file.as_str())),
        [file] if !file.starts_with('-') => (false, Some(file.as_str())),
        _ => return Err(ShellError::app("uniq", "usage: uniq [-i] [FILE]")),
    };

    let content = read_source("uniq", file, runtime, input)?;
    let same = |a: &str, b: &str| {
        if ignore_case {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    };

    let mut kept: Vec<&str> = Vec::new();
    for line in content.lines() {
        if kept.last().map_or(true, |prev| !same(*prev, line)) {
            kept.push(line);
        }
    }
    write_lines(output, kept)
}
