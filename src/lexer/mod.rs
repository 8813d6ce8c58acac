use crate::error::ShellError;
use logos::Logos;

/// Tokens of a command line.
///
/// A `Word` is one raw argument exactly as typed: runs of unquoted text,
/// single-quoted, double-quoted and backquoted spans glued together with
/// their quote characters still in place. Quote removal happens later, at
/// evaluation time, in [`crate::expansion`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    #[token("|")]
    Pipe,

    #[token(";")]
    Semicolon,

    #[token("<")]
    RedirectIn,

    #[token(">")]
    RedirectOut,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    // A backquoted span inside double quotes may itself contain double quotes.
    #[regex(
        r#"([^ \t\r\n'"`;|<>]|'[^'\r\n]*'|"([^"\r\n`]|`[^\r\n`]*`)*"|`[^\r\n`]*`)+"#,
        |lex| lex.slice().to_string()
    )]
    Word(String),
}

pub struct Lexer;

impl Lexer {
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(input);

        while let Some(token_result) = lexer.next() {
            match token_result {
                Ok(token) => tokens.push(token),
                Err(_) => {
                    return Err(LexerError::InvalidToken {
                        position: lexer.span().start,
                        text: input[lexer.span().start..].to_string(),
                    });
                }
            }
        }

        tracing::trace!(?tokens, "tokenized");
        Ok(tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("unterminated quote or unexpected input at position {position}: '{text}'")]
    InvalidToken { position: usize, text: String },
}

impl From<LexerError> for ShellError {
    fn from(err: LexerError) -> Self {
        ShellError::Syntax(err.to_string())
    }
}
