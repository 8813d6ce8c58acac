use crate::error::{Result, ShellError};
use crate::runtime::Runtime;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Wildcard,
}

/// Accumulates one argument character by character, remembering which
/// asterisks were unquoted and therefore act as wildcards.
///
/// Features:
/// - `*` matches zero or more characters, never a path separator
/// - matching is case-sensitive
/// - dotfiles are only matched when the name pattern starts with a literal dot
/// - no matches degrade to the literal text instead of an error
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobPattern {
    pieces: Vec<Piece>,
}

impl GlobPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ch: char) {
        match self.pieces.last_mut() {
            Some(Piece::Literal(text)) => text.push(ch),
            _ => self.pieces.push(Piece::Literal(ch.to_string())),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.push(ch);
        }
    }

    /// Append an unquoted `*`; from now on this argument is a pattern.
    pub fn push_wildcard(&mut self) {
        self.pieces.push(Piece::Wildcard);
    }

    /// Splice another accumulator onto the end of this one.
    pub fn merge(&mut self, other: GlobPattern) {
        for piece in other.pieces {
            match piece {
                Piece::Literal(text) => self.push_str(&text),
                Piece::Wildcard => self.push_wildcard(),
            }
        }
    }

    pub fn is_pattern(&self) -> bool {
        self.pieces.iter().any(|piece| *piece == Piece::Wildcard)
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The argument as typed, quotes removed, wildcards shown as `*`.
    pub fn literal(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                Piece::Literal(text) => text.as_str(),
                Piece::Wildcard => "*",
            })
            .collect()
    }

    /// The `glob` crate pattern. A run of wildcards renders as one `*`,
    /// since `**` there means a recursive directory match.
    fn pattern(&self) -> String {
        let mut pattern = String::new();
        let mut previous_wildcard = false;
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => {
                    pattern.push_str(&Pattern::escape(text));
                    previous_wildcard = false;
                }
                Piece::Wildcard if previous_wildcard => {}
                Piece::Wildcard => {
                    pattern.push('*');
                    previous_wildcard = true;
                }
            }
        }
        pattern
    }

    /// Expand against the filesystem.
    ///
    /// A plain literal comes back unchanged without touching the disk. A
    /// pattern yields every matching path, sorted; relative patterns are
    /// matched under the runtime directory and reported relative to it.
    pub fn glob_files(&self, runtime: &Runtime) -> Result<Vec<String>> {
        let literal = self.literal();
        if !self.is_pattern() {
            return Ok(vec![literal]);
        }

        let cwd = runtime.get_cwd();
        let relative = !Path::new(&literal).is_absolute();
        let pattern = if relative {
            Path::new(&Pattern::escape(&cwd.to_string_lossy()))
                .join(self.pattern())
                .to_string_lossy()
                .to_string()
        } else {
            self.pattern()
        };

        let explicit_dot = Path::new(&literal)
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false);

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: !explicit_dot,
        };

        tracing::trace!(%pattern, "expanding glob");

        let mut matches: Vec<PathBuf> = glob_with(&pattern, options)
            .map_err(|e| ShellError::shell(format!("invalid glob pattern '{}': {}", literal, e)))?
            .filter_map(|entry| entry.ok())
            .collect();

        if matches.is_empty() {
            return Ok(vec![literal]);
        }

        matches.sort();

        Ok(matches
            .into_iter()
            .map(|path| {
                if relative {
                    if let Ok(stripped) = path.strip_prefix(cwd) {
                        return stripped.to_string_lossy().to_string();
                    }
                }
                path.to_string_lossy().to_string()
            })
            .collect())
    }
}

impl From<&str> for GlobPattern {
    fn from(text: &str) -> Self {
        let mut pattern = GlobPattern::new();
        pattern.push_str(text);
        pattern
    }
}
