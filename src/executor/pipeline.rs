use super::Command;
use crate::error::Result;
use crate::runtime::Runtime;
use std::io::{Read, Write};

/// Stages connected by `|`.
///
/// Stages run one at a time. Each intermediate stage writes into an
/// in-memory buffer that becomes the next stage's input; the first stage
/// reads the pipeline's input and the last writes to its output. A failing
/// stage terminates every later stage and its error is returned as-is.
pub struct PipeCommand {
    stages: Vec<Box<dyn Command>>,
}

impl PipeCommand {
    pub fn new(stages: Vec<Box<dyn Command>>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Command for PipeCommand {
    fn evaluate(
        &mut self,
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        let count = self.stages.len();
        let mut carried: Option<Vec<u8>> = None;

        for index in 0..count {
            let is_last = index + 1 == count;
            let mut produced = Vec::new();

            let stage_output: &mut dyn Write = if is_last { &mut *output } else { &mut produced };
            let result = match carried.take() {
                None => self.stages[index].evaluate(runtime, input, stage_output),
                Some(data) => {
                    let mut reader = data.as_slice();
                    self.stages[index].evaluate(runtime, &mut reader, stage_output)
                }
            };

            if let Err(err) = result {
                tracing::debug!(stage = index, error = %err, "pipeline stage failed");
                for later in &mut self.stages[index + 1..] {
                    later.terminate();
                }
                return Err(err);
            }

            if !is_last {
                carried = Some(produced);
            }
        }

        Ok(())
    }

    fn terminate(&mut self) {
        for stage in &mut self.stages {
            stage.terminate();
        }
    }
}
