//! `find [DIR] -name PATTERN`
//!
//! Walks DIR (default `.`) recursively and prints every entry whose file
//! name matches PATTERN, as `DIR/relative/path`, in file-name order.

use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use glob::{MatchOptions, Pattern};
use std::io::{Read, Write};
use walkdir::WalkDir;

#[derive(Debug)]
struct FindOptions {
    start: String,
    name_pattern: Pattern,
}

fn parse_args(args: &[String]) -> Result<FindOptions> {
    let (start, pattern) = match args {
        [flag, pattern] if flag == "-name" => (".".to_string(), pattern),
        [start, flag, pattern] if flag == "-name" => (start.clone(), pattern),
        _ => return Err(ShellError::app("find", "usage: find [DIR] -name PATTERN")),
    };
    let name_pattern = Pattern::new(pattern)
        .map_err(|e| ShellError::app("find", format!("invalid pattern '{}': {}", pattern, e)))?;
    Ok(FindOptions { start, name_pattern })
}

pub fn builtin_find(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let options = parse_args(args)?;
    let root = runtime.resolve(&options.start);
    if !root.is_dir() {
        return Err(ShellError::app(
            "find",
            format!("{}: No such file or directory", options.start),
        ));
    }

    let match_options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let walker = WalkDir::new(&root).min_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| ShellError::app("find", e.to_string()))?;
        let name = entry.file_name().to_string_lossy();
        if !options.name_pattern.matches_with(&name, match_options) {
            continue;
        }

        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        let shown = std::path::Path::new(&options.start).join(relative);
        writeln!(output, "{}", shown.display())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn find(args: &[&str], runtime: &mut Runtime) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        builtin_find(&args, runtime, &mut io::empty(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/nested")).unwrap();
        fs::write(temp.path().join("top.rs"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::write(temp.path().join("src/lib.rs"), "").unwrap();
        fs::write(temp.path().join("src/nested/deep.rs"), "").unwrap();
        temp
    }

    #[test]
    fn test_find_recursive_wildcard() {
        let temp = tree();
        let mut runtime = Runtime::with_cwd(temp.path());
        let out = find(&["-name", "*.rs"], &mut runtime).unwrap();
        assert_eq!(out, "./src/lib.rs\n./src/nested/deep.rs\n./top.rs\n");
    }

    #[test]
    fn test_find_from_directory() {
        let temp = tree();
        let mut runtime = Runtime::with_cwd(temp.path());
        let out = find(&["src", "-name", "deep.rs"], &mut runtime).unwrap();
        assert_eq!(out, "src/nested/deep.rs\n");
    }

    #[test]
    fn test_find_errors() {
        let temp = tree();
        let mut runtime = Runtime::with_cwd(temp.path());
        assert!(find(&["missing", "-name", "x"], &mut runtime).is_err());
        assert!(find(&["-type", "f"], &mut runtime).is_err());
        assert!(find(&[], &mut runtime).is_err());
    }
}
