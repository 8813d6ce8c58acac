use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::sinks::UTF8;
use grep_searcher::{BinaryDetection, Searcher, SearcherBuilder};
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Debug, Default)]
struct GrepConfig {
    pattern: String,
    files: Vec<String>,
    ignore_case: bool,
    invert_match: bool,
    show_line_numbers: bool,
    only_matching: bool,
}

fn parse_args(args: &[String]) -> Result<GrepConfig> {
    let mut config = GrepConfig::default();
    let mut pattern = None;

    for arg in args {
        if pattern.is_none() && arg.starts_with('-') && arg.len() > 1 {
            for ch in arg[1..].chars() {
                match ch {
                    'i' => config.ignore_case = true,
                    'v' => config.invert_match = true,
                    'n' => config.show_line_numbers = true,
                    'o' => config.only_matching = true,
                    _ => return Err(ShellError::app("grep", format!("invalid option -- '{}'", ch))),
                }
            }
        } else if pattern.is_none() {
            pattern = Some(arg.clone());
        } else {
            config.files.push(arg.clone());
        }
    }

    config.pattern = pattern.ok_or_else(|| ShellError::app("grep", "missing pattern"))?;
    Ok(config)
}

/// `grep [-i] [-v] [-n] [-o] PATTERN [FILE...]`
///
/// Prints matching lines, or with `-o` each match on its own line. With
/// more than one file each line is prefixed with `file:`. Finding nothing
/// is not a failure.
pub fn builtin_grep(
    args: &[String],
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let config = parse_args(args)?;

    let matcher = RegexMatcherBuilder::new()
        .case_insensitive(config.ignore_case)
        .build(&config.pattern)
        .map_err(|e| ShellError::app("grep", format!("invalid pattern: {}", e)))?;

    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::quit(b'\x00'))
        .line_number(true)
        .invert_match(config.invert_match)
        .build();

    if config.files.is_empty() {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        let result = searcher.search_slice(
            &matcher,
            &data,
            UTF8(|lnum, line| emit(output, &matcher, &config, None, lnum, line)),
        );
        return result.map_err(|e| ShellError::app("grep", e.to_string()));
    }

    let show_filename = config.files.len() > 1;
    for file in &config.files {
        let path = runtime.resolve(file);
        if !path.exists() {
            return Err(ShellError::app("grep", format!("{}: No such file or directory", file)));
        }
        if path.is_dir() {
            return Err(ShellError::app("grep", format!("{}: Is a directory", file)));
        }

        let prefix = show_filename.then_some(file.as_str());
        search_file(&mut searcher, &matcher, &path, &config, prefix, output)
            .map_err(|e| ShellError::app("grep", format!("{}: {}", file, e)))?;
    }

    Ok(())
}

fn search_file(
    searcher: &mut Searcher,
    matcher: &RegexMatcher,
    path: &Path,
    config: &GrepConfig,
    prefix: Option<&str>,
    output: &mut dyn Write,
) -> io::Result<()> {
    searcher.search_path(
        matcher,
        path,
        UTF8(|lnum, line| emit(output, matcher, config, prefix, lnum, line)),
    )
}

fn emit(
    output: &mut dyn Write,
    matcher: &RegexMatcher,
    config: &GrepConfig,
    prefix: Option<&str>,
    lnum: u64,
    line: &str,
) -> io::Result<bool> {
    if config.only_matching && !config.invert_match {
        let mut parts = Vec::new();
        matcher
            .find_iter(line.as_bytes(), |m| {
                parts.push(&line[m.start()..m.end()]);
                true
            })
            .map_err(|e| io::Error::other(e.to_string()))?;
        for part in parts.into_iter().filter(|part| !part.is_empty()) {
            write_prefix(output, config, prefix, lnum)?;
            writeln!(output, "{}", part)?;
        }
        return Ok(true);
    }

    write_prefix(output, config, prefix, lnum)?;
    write!(output, "{}", line)?;
    if !line.ends_with('\n') {
        writeln!(output)?;
    }
    Ok(true)
}

fn write_prefix(
    output: &mut dyn Write,
    config: &GrepConfig,
    prefix: Option<&str>,
    lnum: u64,
) -> io::Result<()> {
    if let Some(file) = prefix {
        write!(output, "{}:", file)?;
    }
    if config.show_line_numbers {
        write!(output, "{}:", lnum)?;
    }
    Ok(())
}
