use serde::{Deserialize, Serialize};

/// Redirection operators as they appear in a call's raw argument list.
pub const REDIRECT_IN: &str = "<";
pub const REDIRECT_OUT: &str = ">";

/// A parsed command line: one or more `;`-separated segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLine {
    pub segments: Vec<Pipeline>,
}

/// One segment: one or more `|`-connected calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub calls: Vec<Call>,
}

/// A single application invocation.
///
/// `args` holds the raw words, quotes included, in source order. Redirection
/// operators stay inline as the bare strings [`REDIRECT_IN`] and
/// [`REDIRECT_OUT`]; an unquoted word can never equal either of them, so the
/// two cannot be confused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub args: Vec<String>,
}

impl Call {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

pub fn is_redirect(word: &str) -> bool {
    word == REDIRECT_IN || word == REDIRECT_OUT
}
