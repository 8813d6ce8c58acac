use super::read_source;
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// A 1-based inclusive byte range; `None` bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteRange {
    start: Option<usize>,
    end: Option<usize>,
}

impl ByteRange {
    fn contains(&self, position: usize) -> bool {
        self.start.map_or(true, |s| position >= s) && self.end.map_or(true, |e| position <= e)
    }
}

/// Parse a list such as `1,3-5,7-,-2`.
fn parse_ranges(spec: &str) -> Result<Vec<ByteRange>> {
    let invalid = || ShellError::app("cut", format!("invalid byte list: {}", spec));
    let parse_bound = |s: &str| -> Result<Option<usize>> {
        if s.is_empty() {
            return Ok(None);
        }
        match s.parse::<usize>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(n) => Ok(Some(n)),
        }
    };

    let mut ranges = Vec::new();
    for part in spec.split(',') {
        let range = match part.split_once('-') {
            Some((start, end)) => {
                let range = ByteRange {
                    start: parse_bound(start)?,
                    end: parse_bound(end)?,
                };
                if range.start.is_none() && range.end.is_none() {
                    return Err(invalid());
                }
                if let (Some(s), Some(e)) = (range.start, range.end) {
                    if s > e {
                        return Err(invalid());
                    }
                }
                range
            }
            None => {
                let n = parse_bound(part)?.ok_or_else(invalid)?;
                ByteRange {
                    start: Some(n),
                    end: Some(n),
                }
            }
        };
        ranges.push(range);
    }
    Ok(ranges)
}

/// `cut -b LIST [FILE]`
///
/// Keeps the selected bytes of every line, in their original order.
pub fn builtin_cut(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (list, file) = match args {
        [flag, list] if flag == "-b" => (list, None),
        [flag, list, file] if flag == "-b" => (list, Some(file.as_str())),
        _ => return Err(ShellError::app("cut", "usage: cut -b LIST [FILE]")),
    };
    let ranges = parse_ranges(list)?;
    let content = read_source("cut", file, runtime, input)?;

    for line in content.lines() {
        let selected: Vec<u8> = line
            .bytes()
            .enumerate()
            .filter(|(i, _)| ranges.iter().any(|r| r.contains(i + 1)))
            .map(|(_, b)| b)
            .collect();
        output.write_all(&selected)?;
        writeln!(output)?;
    }

    Ok(())
}
