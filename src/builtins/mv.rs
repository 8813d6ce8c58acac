use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::fs;
use std::io::{Read, Write};

/// `mv SRC DEST` renames; `mv SRC... DIR` moves each source into DIR.
pub fn builtin_mv(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    _output: &mut dyn Write,
) -> Result<()> {
    let (dest, sources) = match args.split_last() {
        Some((dest, sources)) if !sources.is_empty() => (dest, sources),
        _ => return Err(ShellError::app("mv", "usage: mv SRC... DEST")),
    };

    let dest_path = runtime.resolve(dest);
    let into_dir = dest_path.is_dir();
    if sources.len() > 1 && !into_dir {
        return Err(ShellError::app("mv", format!("{}: Not a directory", dest)));
    }

    for source in sources {
        let source_path = runtime.resolve(source);
        if !source_path.exists() {
            return Err(ShellError::app("mv", format!("{}: No such file or directory", source)));
        }

        let target = match (into_dir, source_path.file_name()) {
            (true, Some(name)) => dest_path.join(name),
            _ => dest_path.clone(),
        };
        fs::rename(&source_path, &target)
            .map_err(|e| ShellError::app("mv", format!("{} -> {}: {}", source, dest, e)))?;
    }

    Ok(())
}
