use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// Implementation of the `exit` builtin
///
/// Usage:
///   exit [N]
///
/// Raises [`ShellError::Exit`] with code N (default 0). The signal is
/// never swallowed by a sequence or pipeline; it unwinds to whatever
/// drives the shell, which then ends the session with that code.
///
/// Examples:
///   exit        # Exit with code 0
///   exit 1      # Exit with code 1
pub fn builtin_exit(
    args: &[String],
    _runtime: &mut Runtime,
    _input: &mut dyn Read,
    _output: &mut dyn Write,
) -> Result<()> {
    let code = match args {
        [] => 0,
        [code] => code
            .parse::<i32>()
            .map_err(|_| ShellError::app("exit", format!("{}: numeric argument required", code)))?,
        _ => return Err(ShellError::app("exit", "too many arguments")),
    };

    Err(ShellError::Exit(code))
}
