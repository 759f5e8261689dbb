pub use driver::BatchRunner;
pub use error::{Fault, MachineError};
pub use machine::{Machine, Outcome, DEFAULT_MAX_STEPS};
pub use resolve::resolve;
pub use unit::{Destination, MemoryUnit, Operate, Operation, Program, Source, UnitKind};

pub mod driver;
pub mod error;
pub mod machine;
pub mod resolve;
pub mod unit;
