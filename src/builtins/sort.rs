use super::{read_source, write_lines};
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// `sort [-r] [FILE]`
pub fn builtin_sort(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (reverse, file) = match args {
        [] => (false, None),
        [flag] if flag == "-r" => (true, None),
        [flag, file] if flag == "-r" => (true, Some(file.as_str())),
        [file] if !file.starts_with('-') => (false, Some(file.as_str())),
        _ => return Err(ShellError::app("sort", "usage: sort [-r] [FILE]")),
    };

    let content = read_source("sort", file, runtime, input)?;
    let mut lines: Vec<&str> = content.lines().collect();
    lines.sort_unstable();
    if reverse {
        lines.reverse();
    }
    write_lines(output, lines)
}
