use super::read_source;
use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// Options for the cat command
#[derive(Debug, Default)]
struct CatOptions {
    /// Show line numbers
    number_lines: bool,
    /// Files to concatenate
    files: Vec<String>,
}

impl CatOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = CatOptions::default();

        for arg in args {
            if arg.starts_with('-') && arg.len() > 1 {
                for ch in arg[1..].chars() {
                    match ch {
                        'n' => opts.number_lines = true,
                        _ => return Err(ShellError::app("cat", format!("invalid option -- '{}'", ch))),
                    }
                }
            } else {
                opts.files.push(arg.clone());
            }
        }

        Ok(opts)
    }
}

/// `cat [-n] [FILE...]`
///
/// Every line is written back with a trailing newline, so a file without a
/// final line break gains one. With no files, reads the input stream.
pub fn builtin_cat(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let opts = CatOptions::parse(args)?;
    let mut line_number = 1;

    let sources: Vec<Option<&str>> = if opts.files.is_empty() {
        vec![None]
    } else {
        opts.files.iter().map(|f| Some(f.as_str())).collect()
    };

    for source in sources {
        let content = read_source("cat", source, runtime, input)?;
        for line in content.lines() {
            if opts.number_lines {
                write!(output, "{:6}\t", line_number)?;
            }
            writeln!(output, "{}", line)?;
            line_number += 1;
        }
    }

    Ok(())
}
