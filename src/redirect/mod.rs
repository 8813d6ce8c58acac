//! I/O redirection extraction for a single call.
//!
//! Scans a call's raw words left to right. Each `<` or `>` consumes exactly
//! the next word as its target; every other word is kept, in order, for
//! argument resolution. Later redirections of the same kind supersede
//! earlier ones, but superseded `>` targets are still created.

use crate::error::{Result, ShellError};
use crate::expansion::{quote_literal, ArgumentResolver};
use crate::parser::ast::{is_redirect, REDIRECT_IN, REDIRECT_OUT};
use crate::runtime::Runtime;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Input,
    Output,
}

impl RedirectKind {
    fn from_operator(op: &str) -> Option<Self> {
        match op {
            REDIRECT_IN => Some(Self::Input),
            REDIRECT_OUT => Some(Self::Output),
            _ => None,
        }
    }
}

/// One resolved redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub path: PathBuf,
}

/// What is left of a call once its redirections are pulled out.
///
/// The files are owned here and closed when this value is dropped.
#[derive(Debug, Default)]
pub struct Redirections {
    /// Raw words still to be resolved, in source order.
    pub args: Vec<String>,
    pub input: Option<File>,
    pub output: Option<File>,
    pub applied: Vec<Redirect>,
}

#[derive(Clone)]
pub struct IORedirectionHandler {
    resolver: ArgumentResolver,
}

impl IORedirectionHandler {
    pub fn new(resolver: ArgumentResolver) -> Self {
        Self { resolver }
    }

    pub fn extract(&self, raw: &[String], runtime: &Runtime) -> Result<Redirections> {
        let mut result = Redirections::default();
        let mut words = raw.iter();

        while let Some(word) = words.next() {
            let Some(kind) = RedirectKind::from_operator(word) else {
                result.args.push(word.clone());
                continue;
            };

            let target = match words.next() {
                Some(target) if is_redirect(target) => {
                    return Err(ShellError::syntax(format!(
                        "unexpected '{}' after '{}'",
                        target, word
                    )));
                }
                Some(target) => target,
                None => {
                    return Err(ShellError::syntax(format!("missing file name after '{}'", word)));
                }
            };

            let mut resolved = self.resolver.resolve_one(target, runtime)?.into_iter();
            let path = match (kind, resolved.next()) {
                (_, None) => {
                    return Err(ShellError::syntax(format!("'{}' resolves to no file name", target)));
                }
                (RedirectKind::Input, Some(_)) if resolved.len() > 0 => {
                    return Err(ShellError::syntax(format!("ambiguous input redirect '{}'", target)));
                }
                (_, Some(path)) => runtime.resolve(path),
            };

            // Extra names from an output target become ordinary arguments.
            result.args.extend(resolved.map(|extra| quote_literal(&extra)));

            match kind {
                RedirectKind::Input => {
                    let file = open_input(&path)?;
                    if result.input.replace(file).is_some() {
                        tracing::warn!(path = %path.display(), "input redirect superseded");
                    }
                }
                RedirectKind::Output => {
                    let file = open_output(&path)?;
                    if result.output.replace(file).is_some() {
                        tracing::warn!(path = %path.display(), "output redirect superseded");
                    }
                }
            }
            tracing::debug!(?kind, path = %path.display(), "redirect");
            result.applied.push(Redirect { kind, path });
        }

        Ok(result)
    }
}

fn open_input(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(ShellError::file_not_found(path));
    }
    if path.is_dir() {
        return Err(ShellError::cannot_read(path));
    }
    File::open(path).map_err(|_| ShellError::cannot_read(path))
}

fn open_output(path: &Path) -> Result<File> {
    if path.is_dir() {
        return Err(ShellError::is_a_directory(path));
    }
    if path.parent().is_some_and(|parent| !parent.exists()) {
        return Err(ShellError::file_not_found(path));
    }
    File::create(path).map_err(|e| ShellError::shell(format!("{}: {}", path.display(), e)))
}
