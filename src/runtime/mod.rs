use crate::error::{Result, ShellError};
use std::env;
use std::path::{Path, PathBuf};

const MAX_SUBSTITUTION_DEPTH: usize = 64;

/// Execution context threaded through every evaluation.
///
/// Holds the shell's current directory. Nothing in the engine reads the
/// process-wide directory after start-up; every path-resolving step goes
/// through [`Runtime::resolve`], and only the `cd` application changes it.
#[derive(Debug, Clone)]
pub struct Runtime {
    cwd: PathBuf,
    substitution_depth: usize,
    max_substitution_depth: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::with_cwd(cwd)
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            substitution_depth: 0,
            max_substitution_depth: MAX_SUBSTITUTION_DEPTH,
        }
    }

    pub fn set_cwd(&mut self, path: PathBuf) {
        self.cwd = path;
    }

    pub fn get_cwd(&self) -> &PathBuf {
        &self.cwd
    }

    /// Absolute paths are returned unchanged; relative ones are joined onto
    /// the current directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Context for evaluating a backquoted sub-command.
    ///
    /// The child is a copy: directory changes made inside the substitution
    /// do not leak back into the caller.
    pub fn substitution(&self) -> Result<Runtime> {
        if self.substitution_depth >= self.max_substitution_depth {
            return Err(ShellError::shell(format!(
                "maximum substitution depth exceeded ({})",
                self.max_substitution_depth
            )));
        }
        let mut child = self.clone();
        child.substitution_depth += 1;
        Ok(child)
    }

    pub fn substitution_depth(&self) -> usize {
        self.substitution_depth
    }
}
