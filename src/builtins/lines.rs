//! `head` and `tail`: the first or last lines of a file or the input.

use super::{read_source, write_lines};
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

const DEFAULT_LINES: usize = 10;

pub fn builtin_head(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (count, file) = parse_args("head", args)?;
    let content = read_source("head", file.as_deref(), runtime, input)?;
    write_lines(output, content.lines().take(count))
}

pub fn builtin_tail(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (count, file) = parse_args("tail", args)?;
    let content = read_source("tail", file.as_deref(), runtime, input)?;
    let lines: Vec<&str> = content.lines().collect();
    let skip = lines.len().saturating_sub(count);
    write_lines(output, lines.into_iter().skip(skip))
}

/// `[-n N] [FILE]`
fn parse_args(app: &str, args: &[String]) -> Result<(usize, Option<String>)> {
    match args {
        [] => Ok((DEFAULT_LINES, None)),
        [file] if file != "-n" => Ok((DEFAULT_LINES, Some(file.clone()))),
        [flag, count] if flag == "-n" => Ok((parse_count(app, count)?, None)),
        [flag, count, file] if flag == "-n" => Ok((parse_count(app, count)?, Some(file.clone()))),
        _ => Err(ShellError::app(app, "usage: [-n COUNT] [FILE]")),
    }
}

fn parse_count(app: &str, count: &str) -> Result<usize> {
    count
        .parse::<usize>()
        .map_err(|_| ShellError::app(app, format!("{}: invalid number of lines", count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        func: fn(&[String], &mut Runtime, &mut dyn Read, &mut dyn Write) -> Result<()>,
        args: &[&str],
        stdin: &str,
    ) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut runtime = Runtime::with_cwd("/");
        let mut out = Vec::new();
        func(&args, &mut runtime, &mut stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn numbers(n: usize) -> String {
        (1..=n).map(|i| format!("{}\n", i)).collect()
    }

    #[test]
    fn test_head_default() {
        assert_eq!(run(builtin_head, &[], &numbers(12)).unwrap(), numbers(10));
    }

    #[test]
    fn test_head_count() {
        assert_eq!(run(builtin_head, &["-n", "2"], &numbers(5)).unwrap(), "1\n2\n");
    }

    #[test]
    fn test_tail_count() {
        assert_eq!(run(builtin_tail, &["-n", "2"], &numbers(5)).unwrap(), "4\n5\n");
    }

    #[test]
    fn test_tail_more_than_available() {
        assert_eq!(run(builtin_tail, &["-n", "9"], "a\nb").unwrap(), "a\nb\n");
    }

    #[test]
    fn test_invalid_count() {
        assert!(run(builtin_head, &["-n", "x"], "").is_err());
        assert!(run(builtin_tail, &["-n"], "").is_err());
    }
}
