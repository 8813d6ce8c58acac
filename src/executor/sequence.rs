use super::Command;
use crate::error::Result;
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// Commands separated by `;`, run left to right on shared streams.
///
/// A failing command has its message written to the output as one line
/// and the next command still runs. Only the exit signal stops the
/// sequence, along with a failure to write that message.
pub struct SequenceCommand {
    commands: Vec<Box<dyn Command>>,
}

impl SequenceCommand {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for SequenceCommand {
    fn evaluate(
        &mut self,
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        for command in &mut self.commands {
            match command.evaluate(runtime, input, output) {
                Ok(()) => {}
                Err(err) if err.is_exit() => return Err(err),
                Err(err) => {
                    tracing::debug!(error = %err, "sequence member failed");
                    writeln!(output, "{}", err)?;
                }
            }
        }
        Ok(())
    }

    fn terminate(&mut self) {
        for command in &mut self.commands {
            command.terminate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use std::io;

    struct Scripted {
        result: Option<ShellError>,
        text: &'static str,
    }

    impl Scripted {
        fn ok(text: &'static str) -> Box<dyn Command> {
            Box::new(Self {
                result: None,
                text,
            })
        }

        fn err(err: ShellError) -> Box<dyn Command> {
            Box::new(Self {
                result: Some(err),
                text: "",
            })
        }
    }

    impl Command for Scripted {
        fn evaluate(
            &mut self,
            _runtime: &mut Runtime,
            _input: &mut dyn Read,
            output: &mut dyn Write,
        ) -> Result<()> {
            output.write_all(self.text.as_bytes())?;
            match self.result.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn terminate(&mut self) {}
    }

    fn run(commands: Vec<Box<dyn Command>>) -> (Result<()>, String) {
        let mut sequence = SequenceCommand::new(commands);
        let mut runtime = Runtime::with_cwd("/");
        let mut out = Vec::new();
        let result = sequence.evaluate(&mut runtime, &mut io::empty(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_failure_reported_then_continues() {
        let (result, out) = run(vec![
            Scripted::err(ShellError::app("cat", "nope: No such file or directory")),
            Scripted::ok("second\n"),
        ]);
        assert!(result.is_ok());
        assert_eq!(out, "cat: nope: No such file or directory\nsecond\n");
    }

    #[test]
    fn test_shell_failure_also_reported() {
        let (result, out) = run(vec![Scripted::err(ShellError::shell("bad")), Scripted::ok("ok\n")]);
        assert!(result.is_ok());
        assert_eq!(out, "shell: bad\nok\n");
    }

    #[test]
    fn test_exit_stops_everything() {
        let (result, out) = run(vec![
            Scripted::ok("first\n"),
            Scripted::err(ShellError::Exit(3)),
            Scripted::ok("never\n"),
        ]);
        assert!(matches!(result, Err(ShellError::Exit(3))));
        assert_eq!(out, "first\n");
    }

    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_writing_report_is_fatal() {
        let mut sequence = SequenceCommand::new(vec![
            Scripted::err(ShellError::app("x", "y")),
            Scripted::ok(""),
        ]);
        let mut runtime = Runtime::with_cwd("/");
        let err = sequence
            .evaluate(&mut runtime, &mut io::empty(), &mut BrokenOutput)
            .unwrap_err();
        assert!(matches!(err, ShellError::Shell(_)));
    }
}
