use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::fs;
use std::io::{Read, Write};

/// `ls [-a] [DIR]`
///
/// Lists one entry per line, sorted by name. Hidden entries are skipped
/// unless `-a` is given. A file operand is echoed back as-is.
pub fn builtin_ls(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let (show_hidden, paths) = parse_args(args)?;

    let target = match paths.as_slice() {
        [] => ".",
        [path] => path.as_str(),
        _ => return Err(ShellError::app("ls", "too many arguments")),
    };

    let full = runtime.resolve(target);
    if !full.exists() {
        return Err(ShellError::app("ls", format!("{}: No such file or directory", target)));
    }
    if !full.is_dir() {
        writeln!(output, "{}", target)?;
        return Ok(());
    }

    let entries = fs::read_dir(&full).map_err(|e| ShellError::app("ls", format!("{}: {}", target, e)))?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| show_hidden || !name.starts_with('.'))
        .collect();
    names.sort();

    for name in names {
        writeln!(output, "{}", name)?;
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(bool, Vec<String>)> {
    let mut show_hidden = false;
    let mut paths = Vec::new();

    for arg in args {
        if arg.starts_with('-') && arg.len() > 1 {
            for ch in arg[1..].chars() {
                match ch {
                    'a' => show_hidden = true,
                    _ => return Err(ShellError::app("ls", format!("invalid option -- '{}'", ch))),
                }
            }
        } else {
            paths.push(arg.clone());
        }
    }

    Ok((show_hidden, paths))
}
