use crate::error::{Fault, MachineError};
use crate::machine::{Machine, Outcome, DEFAULT_MAX_STEPS};
use crate::unit::Program;
use log::debug;

/// Runs one program against successive input batches, each on a freshly
/// constructed machine.
#[derive(Debug)]
pub struct BatchRunner<'p> {
    program: &'p Program,
    max_steps: u64,
}

impl<'p> BatchRunner<'p> {
    /// # Errors
    ///
    /// `NoTerminalInstruction` if nothing in the program can ever stop a run.
    pub fn new(program: &'p Program) -> Result<Self, MachineError> {
        if !program.has_terminal_instruction() {
            return Err(MachineError::NoTerminalInstruction);
        }
        Ok(Self {
            program,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn run_batch(&self, input: Vec<i64>) -> Result<Outcome, Fault> {
        let mut machine = Machine::with_program(self.program);
        machine.set_input(input);
        let result = machine.run_until(self.max_steps);
        debug!("Batch finished: {:?} ({:?})", result, machine);
        result
    }

    /// Lazily run every batch in order. Each item is that batch's result;
    /// a fault in one batch doesn't affect the others.
    pub fn run_all<'a, I>(
        &'a self,
        batches: I,
    ) -> impl Iterator<Item = Result<Outcome, Fault>> + 'a
    where
        I: IntoIterator<Item = Vec<i64>>,
        I::IntoIter: 'a,
    {
        batches.into_iter().map(move |batch| self.run_batch(batch))
    }
}
