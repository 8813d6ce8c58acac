pub mod ast;

use crate::error::{Result, ShellError};
use crate::lexer::{Lexer, Token};
use ast::*;

/// Recursive-descent parser over the token stream.
///
/// Grammar:
///
/// ```text
/// line     := pipeline (';' pipeline)*
/// pipeline := call ('|' call)*
/// call     := item+            (at least one item is a word)
/// item     := WORD | ('<' | '>') WORD
/// ```
///
/// Parsing is a pure syntax check: nothing is resolved or evaluated here.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokenize and parse a raw command line.
    pub fn parse_line(input: &str) -> Result<CommandLine> {
        if input.trim().is_empty() {
            return Err(ShellError::syntax("empty command"));
        }
        let tokens = Lexer::tokenize(input)?;
        Parser::new(tokens).parse()
    }

    pub fn parse(&mut self) -> Result<CommandLine> {
        if self.tokens.is_empty() {
            return Err(ShellError::syntax("empty command"));
        }
        if self.tokens.contains(&Token::Newline) {
            return Err(ShellError::syntax("line breaks are not allowed"));
        }

        let mut segments = vec![self.parse_pipeline()?];

        while let Some(token) = self.advance() {
            match token {
                Token::Semicolon => {
                    if self.is_at_end() {
                        return Err(ShellError::syntax("unexpected ';' at end of line"));
                    }
                    segments.push(self.parse_pipeline()?);
                }
                other => return Err(unexpected(&other)),
            }
        }

        tracing::debug!(segments = segments.len(), "parsed command line");
        Ok(CommandLine { segments })
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline> {
        let mut calls = vec![self.parse_call()?];

        while self.match_token(&Token::Pipe) {
            self.advance();
            calls.push(self.parse_call()?);
        }

        Ok(Pipeline { calls })
    }

    fn parse_call(&mut self) -> Result<Call> {
        let mut args = Vec::new();
        let mut has_word = false;

        loop {
            match self.peek() {
                Some(Token::Word(word)) => {
                    args.push(word.clone());
                    has_word = true;
                    self.advance();
                }
                Some(Token::RedirectIn) | Some(Token::RedirectOut) => {
                    let operator = match self.advance() {
                        Some(Token::RedirectIn) => REDIRECT_IN,
                        _ => REDIRECT_OUT,
                    };
                    let target = self.parse_redirect_target(operator)?;
                    args.push(operator.to_string());
                    args.push(target);
                }
                _ => break,
            }
        }

        if !has_word {
            return Err(match self.peek() {
                Some(token) => unexpected(token),
                None if args.is_empty() => ShellError::syntax("expected a command"),
                None => ShellError::syntax("expected a command before redirection"),
            });
        }

        Ok(Call::new(args))
    }

    fn parse_redirect_target(&mut self, operator: &str) -> Result<String> {
        match self.advance() {
            Some(Token::Word(target)) => Ok(target),
            Some(other) => Err(ShellError::syntax(format!(
                "expected a file name after '{}', found {}",
                operator,
                describe(&other)
            ))),
            None => Err(ShellError::syntax(format!(
                "expected a file name after '{}'",
                operator
            ))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn match_token(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Pipe => "'|'".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::RedirectIn => "'<'".to_string(),
        Token::RedirectOut => "'>'".to_string(),
        Token::Newline => "line break".to_string(),
        Token::Word(word) => format!("'{}'", word),
    }
}

fn unexpected(token: &Token) -> ShellError {
    ShellError::syntax(format!("unexpected {}", describe(token)))
}
