//! Command tree construction and evaluation.
//!
//! A parsed line becomes a tree of [`Command`]s: a [`SequenceCommand`] of
//! `;`-separated segments, each a [`PipeCommand`] of `|`-connected stages or
//! a lone [`CallCommand`]. Evaluating the root evaluates the whole line,
//! depth first, on the caller's thread.

pub mod call;
pub mod pipeline;
pub mod sequence;
pub mod suggestions;

pub use call::{CallCommand, CallState};
pub use pipeline::PipeCommand;
pub use sequence::SequenceCommand;

use crate::builtins::Builtins;
use crate::error::Result;
use crate::parser::ast::{CommandLine, Pipeline};
use crate::parser::Parser;
use crate::runtime::Runtime;
use std::io::{Read, Write};
use std::sync::Arc;

/// A unit of evaluation in the command tree.
pub trait Command {
    /// Run the command, reading from `input` and writing to `output`.
    fn evaluate(
        &mut self,
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()>;

    /// Stop a command that has not started yet. A no-op once it has run.
    fn terminate(&mut self);
}

/// Builds command trees from raw lines.
#[derive(Clone)]
pub struct CommandBuilder {
    builtins: Arc<Builtins>,
}

impl CommandBuilder {
    pub fn new(builtins: Arc<Builtins>) -> Self {
        Self { builtins }
    }

    /// Parse `line` into an executable tree. Nothing runs on failure.
    pub fn build(&self, line: &str) -> Result<Box<dyn Command>> {
        let parsed = Parser::parse_line(line)?;
        Ok(self.from_ast(parsed))
    }

    pub fn from_ast(&self, line: CommandLine) -> Box<dyn Command> {
        let mut segments: Vec<Box<dyn Command>> = line
            .segments
            .into_iter()
            .map(|segment| self.pipeline(segment))
            .collect();

        if segments.len() == 1 {
            if let Some(only) = segments.pop() {
                return only;
            }
        }
        Box::new(SequenceCommand::new(segments))
    }

    fn pipeline(&self, pipeline: Pipeline) -> Box<dyn Command> {
        let mut stages: Vec<Box<dyn Command>> = pipeline
            .calls
            .into_iter()
            .map(|call| Box::new(CallCommand::new(call.args, self.builtins.clone())) as Box<dyn Command>)
            .collect();

        if stages.len() == 1 {
            if let Some(only) = stages.pop() {
                return only;
            }
        }
        Box::new(PipeCommand::new(stages))
    }
}

/// Parse `line` with the given application registry.
pub fn parse_command(line: &str, builtins: Arc<Builtins>) -> Result<Box<dyn Command>> {
    CommandBuilder::new(builtins).build(line)
}

/// Parse and evaluate one line against `runtime`.
pub fn eval(
    line: &str,
    builtins: Arc<Builtins>,
    runtime: &mut Runtime,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    let mut command = parse_command(line, builtins)?;
    command.evaluate(runtime, input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use std::io;

    fn run(line: &str) -> Result<String> {
        let mut runtime = Runtime::with_cwd("/");
        let mut out = Vec::new();
        eval(line, Arc::new(Builtins::new()), &mut runtime, &mut io::empty(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_call() {
        assert_eq!(run("echo hello").unwrap(), "hello\n");
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(run("echo b a | cut -b 1").unwrap(), "b\n");
    }

    #[test]
    fn test_sequence() {
        assert_eq!(run("echo one; echo two").unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_syntax_error_runs_nothing() {
        assert!(matches!(run("echo hi ;; echo no"), Err(ShellError::Syntax(_))));
    }

    #[test]
    fn test_substitution_runs_full_command_line() {
        assert_eq!(run("echo \"`echo abc | cut -b 1`\"").unwrap(), "a\n");
        assert_eq!(run("echo `echo x; echo y`").unwrap(), "x y\n");
    }
}
