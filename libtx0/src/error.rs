use thiserror::Error;

/// Conditions that mean the program itself is malformed. These abort a run;
/// a program ending on its own ERROR destination is an [`crate::Outcome`].
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum MachineError {
    #[error("Couldn't find label {0}")]
    UnresolvedLabel(String),
    #[error("Address {address} is outside memory ({size} units)")]
    OutOfRange { address: i64, size: usize },
    #[error("Unit at {address} is a {found}, expected {expected}")]
    TypeMismatch {
        address: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Program has no OPERATE instruction that halts or errors")]
    NoTerminalInstruction,
    #[error("Step limit of {0} reached")]
    StepLimit(u64),
}

/// A [`MachineError`] raised while executing the instruction at `address`.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("Fault at {address}: {error}")]
pub struct Fault {
    pub address: usize,
    #[source]
    pub error: MachineError,
}
