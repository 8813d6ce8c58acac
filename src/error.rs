//! Structured error types for the tush shell
//!
//! Every failure surfaced by the engine is a [`ShellError`]. The variant
//! tells a composing command how to treat it: a `SequenceCommand` reports
//! and continues past anything but [`ShellError::Exit`], while a
//! `PipeCommand` aborts on every variant.

use serde::Serialize;
use std::io;
use std::path::Path;

pub type Result<T, E = ShellError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Malformed grammar, unterminated quoting or misplaced redirection.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Failure of the engine itself: stream, lookup or resolution problems.
    #[error("shell: {0}")]
    Shell(String),

    /// Failure raised by a dispatched application.
    #[error("{app}: {message}")]
    Application { app: String, message: String },

    /// Not a real error; unwinds to the top level and ends the shell.
    #[error("exit {0}")]
    Exit(i32),
}

impl ShellError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    pub fn shell(message: impl Into<String>) -> Self {
        Self::Shell(message.into())
    }

    pub fn app(app: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Application {
            app: app.into(),
            message: message.into(),
        }
    }

    /// File not found error
    pub fn file_not_found(path: &Path) -> Self {
        Self::shell(format!("{}: No such file or directory", path.display()))
    }

    /// Is a directory error (when a file was expected)
    pub fn is_a_directory(path: &Path) -> Self {
        Self::shell(format!("{}: Is a directory", path.display()))
    }

    pub fn cannot_read(path: &Path) -> Self {
        Self::shell(format!("{}: Cannot read", path.display()))
    }

    pub fn unknown_application(name: &str) -> Self {
        Self::shell(format!("{}: unknown application", name))
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }

    /// Stable machine-readable category.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "SYNTAX_ERROR",
            Self::Shell(_) => "SHELL_ERROR",
            Self::Application { .. } => "APPLICATION_ERROR",
            Self::Exit(_) => "EXIT",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Syntax(_) => 2,
            Self::Exit(code) => *code,
            _ => 1,
        }
    }

    /// Format error as JSON string
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Rendered<'a> {
            error_code: &'a str,
            message: String,
            exit_code: i32,
        }

        let rendered = Rendered {
            error_code: self.error_code(),
            message: self.to_string(),
            exit_code: self.exit_code(),
        };
        serde_json::to_string(&rendered).unwrap_or_else(|_| {
            format!(
                r#"{{"error_code":"{}","message":"{}","exit_code":{}}}"#,
                rendered.error_code, rendered.message, rendered.exit_code
            )
        })
    }

    /// Render for a human or, when `json` is set, as one JSON line.
    pub fn render(&self, json: bool) -> String {
        if json {
            self.to_json()
        } else {
            self.to_string()
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(err: io::Error) -> Self {
        Self::Shell(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found() {
        let err = ShellError::file_not_found(Path::new("/tmp/nonexistent"));
        assert_eq!(err.error_code(), "SHELL_ERROR");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("shell: "));
        assert!(err.to_string().contains("No such file or directory"));
    }

    #[test]
    fn test_is_a_directory() {
        let err = ShellError::is_a_directory(Path::new("/tmp"));
        assert!(err.to_string().contains("Is a directory"));
    }

    #[test]
    fn test_application_prefix() {
        let err = ShellError::app("cat", "missing.txt: No such file or directory");
        assert_eq!(err.to_string(), "cat: missing.txt: No such file or directory");
        assert_eq!(err.error_code(), "APPLICATION_ERROR");
    }

    #[test]
    fn test_syntax_exit_code() {
        let err = ShellError::syntax("unexpected '|'");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "syntax error: unexpected '|'");
    }

    #[test]
    fn test_exit_signal() {
        let err = ShellError::Exit(3);
        assert!(err.is_exit());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_to_json() {
        let err = ShellError::app("grep", "bad \"pattern\"");
        let json = err.to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error_code"], "APPLICATION_ERROR");
        assert_eq!(value["message"], "grep: bad \"pattern\"");
        assert_eq!(value["exit_code"], 1);
    }

    #[test]
    fn test_from_io_error() {
        let err: ShellError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(matches!(err, ShellError::Shell(_)));
    }
}
