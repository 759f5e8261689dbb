use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Serialize, Deserialize, Debug, EnumString, Display, Eq, PartialEq, Clone, Copy)]
pub enum Source {
    AC,
    READ,
    EOF,
}

#[derive(Serialize, Deserialize, Debug, EnumString, Display, Eq, PartialEq, Clone, Copy)]
pub enum Operation {
    COPY,
    CLEAR,
    NEGATE,
}

#[derive(Serialize, Deserialize, Debug, EnumString, Display, Eq, PartialEq, Clone, Copy)]
pub enum Destination {
    AC,
    HALT,
    ERROR,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
pub struct Operate {
    pub source: Source,
    pub operation: Operation,
    pub destination: Destination,
}

impl Operate {
    pub fn new(source: Source, operation: Operation, destination: Destination) -> Self {
        Self {
            source,
            operation,
            destination,
        }
    }

    /// Applies the micro-operation to a sourced value.
    pub fn apply(&self, value: i64) -> i64 {
        match self.operation {
            Operation::COPY => value,
            Operation::CLEAR => 0,
            Operation::NEGATE => value.wrapping_neg(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.destination, Destination::HALT | Destination::ERROR)
    }
}

/// The contents of one memory cell. Instruction operands are kept as the
/// token written in the program and resolved when the instruction runs.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
pub enum UnitKind {
    Data(i64),
    Store(String),
    Add(String),
    Transfer(String),
    Operate(Operate),
}

impl UnitKind {
    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Data(_) => "data word",
            UnitKind::Store(_) => "STORE instruction",
            UnitKind::Add(_) => "ADD instruction",
            UnitKind::Transfer(_) => "TRANSFER instruction",
            UnitKind::Operate(_) => "OPERATE instruction",
        }
    }

    pub fn is_instruction(&self) -> bool {
        !matches!(self, UnitKind::Data(_))
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Data(value) => write!(f, "WORD {}", value),
            UnitKind::Store(operand) => write!(f, "STORE {}", operand),
            UnitKind::Add(operand) => write!(f, "ADD {}", operand),
            UnitKind::Transfer(operand) => write!(f, "TRANSFER {}", operand),
            UnitKind::Operate(op) => write!(
                f,
                "OPERATE {},{},{}",
                op.source, op.operation, op.destination
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
pub struct MemoryUnit {
    pub label: Option<String>,
    pub kind: UnitKind,
}

impl MemoryUnit {
    pub fn new(kind: UnitKind) -> Self {
        Self { label: None, kind }
    }

    pub fn labeled(label: &str, kind: UnitKind) -> Self {
        Self {
            label: Some(label.into()),
            kind,
        }
    }

    pub fn is_labeled(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// A loaded memory image. Position in `units` is the unit's address.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Default)]
pub struct Program {
    units: Vec<MemoryUnit>,
}

impl Program {
    pub fn new(units: Vec<MemoryUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[MemoryUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_terminal_instruction(&self) -> bool {
        self.units
            .iter()
            .any(|unit| matches!(&unit.kind, UnitKind::Operate(op) if op.is_terminal()))
    }
}

impl From<Vec<MemoryUnit>> for Program {
    fn from(units: Vec<MemoryUnit>) -> Self {
        Program::new(units)
    }
}
