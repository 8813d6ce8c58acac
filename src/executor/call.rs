use super::Command;
use crate::builtins::Builtins;
use crate::error::{Result, ShellError};
use crate::expansion::ArgumentResolver;
use crate::redirect::IORedirectionHandler;
use crate::runtime::Runtime;
use std::io::{Read, Write};
use std::sync::Arc;

/// Lifecycle of a [`CallCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Built,
    /// Extracting redirections and resolving arguments.
    Resolving,
    /// The application is running.
    Dispatched,
    Done,
    Failed,
    /// Stopped before dispatch; evaluation does nothing.
    Terminated,
}

/// A single application invocation, the leaf of every command tree.
pub struct CallCommand {
    args: Vec<String>,
    builtins: Arc<Builtins>,
    state: CallState,
}

impl CallCommand {
    pub fn new(args: Vec<String>, builtins: Arc<Builtins>) -> Self {
        Self {
            args,
            builtins,
            state: CallState::Built,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    fn dispatch(
        &mut self,
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        let resolver = ArgumentResolver::new(self.builtins.clone());
        let handler = IORedirectionHandler::new(resolver.clone());

        // Both files close when `redirections` drops, on every path out.
        let mut redirections = handler.extract(&self.args, runtime)?;
        let args = resolver.resolve_arguments(&redirections.args, runtime)?;
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| ShellError::shell("no application to run"))?;
        let app = self.builtins.get(name)?;

        let input: &mut dyn Read = match redirections.input.as_mut() {
            Some(file) => file,
            None => input,
        };
        let output: &mut dyn Write = match redirections.output.as_mut() {
            Some(file) => file,
            None => output,
        };

        self.state = CallState::Dispatched;
        tracing::debug!(app = %name, args = ?rest, "dispatch");
        app.run(rest, runtime, input, output)?;
        output.flush()?;
        Ok(())
    }
}

impl Command for CallCommand {
    fn evaluate(
        &mut self,
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        match self.state {
            CallState::Built => {}
            CallState::Terminated => return Ok(()),
            state => {
                return Err(ShellError::shell(format!(
                    "call evaluated twice (state {:?})",
                    state
                )))
            }
        }

        self.state = CallState::Resolving;
        let result = self.dispatch(runtime, input, output);
        self.state = match result {
            Ok(()) => CallState::Done,
            Err(_) => CallState::Failed,
        };
        result
    }

    fn terminate(&mut self) {
        if matches!(self.state, CallState::Built | CallState::Resolving) {
            tracing::trace!(args = ?self.args, "call terminated");
            self.state = CallState::Terminated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn call(args: &[&str]) -> CallCommand {
        let args = args.iter().map(|s| s.to_string()).collect();
        CallCommand::new(args, Arc::new(Builtins::new()))
    }

    #[test]
    fn test_states_on_success() {
        let mut command = call(&["echo", "hi"]);
        assert_eq!(command.state(), CallState::Built);

        let mut runtime = Runtime::with_cwd("/");
        let mut out = Vec::new();
        command.evaluate(&mut runtime, &mut io::empty(), &mut out).unwrap();
        assert_eq!(command.state(), CallState::Done);
        assert_eq!(out, b"hi\n");
    }

    #[test]
    fn test_states_on_failure() {
        let mut command = call(&["cat", "/definitely/missing"]);
        let mut runtime = Runtime::with_cwd("/");
        let err = command
            .evaluate(&mut runtime, &mut io::empty(), &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, ShellError::Application { .. }));
        assert_eq!(command.state(), CallState::Failed);
    }

    #[test]
    fn test_terminate_before_dispatch() {
        let mut command = call(&["echo", "never"]);
        command.terminate();
        assert_eq!(command.state(), CallState::Terminated);

        let mut runtime = Runtime::with_cwd("/");
        let mut out = Vec::new();
        command.evaluate(&mut runtime, &mut io::empty(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_terminate_after_done_is_noop() {
        let mut command = call(&["true"]);
        let mut runtime = Runtime::with_cwd("/");
        command.evaluate(&mut runtime, &mut io::empty(), &mut io::sink()).unwrap();
        command.terminate();
        assert_eq!(command.state(), CallState::Done);
    }

    #[test]
    fn test_unknown_application_is_shell_error() {
        let mut command = call(&["nosuchapp"]);
        let mut runtime = Runtime::with_cwd("/");
        let err = command
            .evaluate(&mut runtime, &mut io::empty(), &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, ShellError::Shell(_)));
    }

    #[test]
    fn test_empty_after_resolution_is_shell_error() {
        let mut command = call(&["`true`"]);
        let mut runtime = Runtime::with_cwd("/");
        let err = command
            .evaluate(&mut runtime, &mut io::empty(), &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, ShellError::Shell(_)));
    }

    #[test]
    fn test_redirected_streams_replace_callers() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("in.txt"), "from file\n").unwrap();
        let mut runtime = Runtime::with_cwd(temp.path());

        let mut command = call(&["cat", "<", "in.txt", ">", "out.txt"]);
        let mut out = Vec::new();
        command
            .evaluate(&mut runtime, &mut "from caller".as_bytes(), &mut out)
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(
            fs::read_to_string(temp.path().join("out.txt")).unwrap(),
            "from file\n"
        );
    }

    #[test]
    fn test_reads_cwd_at_evaluation() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f.txt"), "x\n").unwrap();
        let mut command = call(&["cat", "f.txt"]);

        let mut runtime = Runtime::with_cwd("/");
        runtime.set_cwd(temp.path().to_path_buf());
        let mut out = Vec::new();
        command.evaluate(&mut runtime, &mut io::empty(), &mut out).unwrap();
        assert_eq!(out, b"x\n");
    }
}
