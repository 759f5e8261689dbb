use crate::error::{Fault, MachineError};
use crate::resolve::resolve;
use crate::unit::{Destination, MemoryUnit, Program, Source, UnitKind};
use log::trace;
use std::fmt::{Debug, Display};

pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

#[allow(non_snake_case)]
pub struct Machine {
    pub memory: Vec<MemoryUnit>,
    pub AC: i64,
    pub IP: usize,
    pub result: Option<i64>,
    pub error_flag: bool,
    pub eof: bool,
    input: Vec<i64>,
    cursor: usize,
}

impl Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("AC", &self.AC)
            .field("IP", &self.IP)
            .field("result", &self.result)
            .field("error_flag", &self.error_flag)
            .field("eof", &self.eof)
            .finish()
    }
}

/// How a run ended when the program stopped itself.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Halt(i64),
    Error(i64),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Halt(value) => write!(f, "HALT {}", value),
            Outcome::Error(_) => write!(f, "ERROR"),
        }
    }
}

impl Machine {
    pub fn empty() -> Self {
        Self {
            memory: Vec::new(),
            AC: 0,
            IP: 0,
            result: None,
            error_flag: false,
            eof: false,
            input: Vec::new(),
            cursor: 0,
        }
    }

    /// A machine with its own copy of the program's memory, so stores made
    /// during this run never reach the shared image.
    pub fn with_program(program: &Program) -> Self {
        let mut machine = Machine::empty();
        machine.memory = program.units().to_vec();
        machine
    }

    pub fn set_input(&mut self, input: Vec<i64>) {
        self.input = input;
        self.cursor = 0;
        self.eof = false;
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match (self.result, self.error_flag) {
            (value, true) => Some(Outcome::Error(value.unwrap_or(0))),
            (Some(value), false) => Some(Outcome::Halt(value)),
            (None, false) => None,
        }
    }

    pub fn run(&mut self) -> Result<Outcome, Fault> {
        self.run_until(DEFAULT_MAX_STEPS)
    }

    pub fn run_until(&mut self, max_steps: u64) -> Result<Outcome, Fault> {
        let mut steps = 0;
        loop {
            if let Some(outcome) = self.outcome() {
                break Ok(outcome);
            }
            if steps >= max_steps {
                break Err(Fault {
                    address: self.IP,
                    error: MachineError::StepLimit(max_steps),
                });
            }
            self.step()?;
            steps += 1;
        }
    }

    pub fn step(&mut self) -> Result<(), Fault> {
        let address = self.IP;
        let unit = self
            .fetch()
            .and_then(|unit| self.execute(&unit).map(|_| unit))
            .map_err(|error| Fault { address, error })?;
        trace!("{:>5}  {:<28} AC={}", address, unit.to_string(), self.AC);
        Ok(())
    }

    fn fetch(&self) -> Result<UnitKind, MachineError> {
        let unit = self.memory.get(self.IP).ok_or(MachineError::OutOfRange {
            address: self.IP as i64,
            size: self.memory.len(),
        })?;
        if !unit.kind.is_instruction() {
            return Err(MachineError::TypeMismatch {
                address: self.IP,
                expected: "instruction",
                found: unit.kind.name(),
            });
        }
        Ok(unit.kind.clone())
    }

    fn execute(&mut self, unit: &UnitKind) -> Result<(), MachineError> {
        match unit {
            UnitKind::Store(operand) => {
                self.IP += 1;
                let address = resolve(&self.memory, operand)?;
                *self.data_mut(address)? = self.AC;
            }
            UnitKind::Add(operand) => {
                self.IP += 1;
                let address = resolve(&self.memory, operand)?;
                self.AC = self.AC.wrapping_add(self.data_at(address)?);
            }
            UnitKind::Transfer(operand) => {
                let target = resolve(&self.memory, operand)?;
                if self.AC < 0 {
                    self.IP = target;
                } else {
                    self.IP += 1;
                }
            }
            UnitKind::Operate(op) => {
                self.IP += 1;
                let value = op.apply(self.source(op.source));
                match op.destination {
                    Destination::AC => self.AC = value,
                    Destination::HALT => self.result = Some(value),
                    Destination::ERROR => {
                        self.result = Some(value);
                        self.error_flag = true;
                    }
                }
            }
            // Rejected by fetch
            UnitKind::Data(_) => unreachable!(),
        }
        Ok(())
    }

    fn source(&mut self, source: Source) -> i64 {
        match source {
            Source::AC => self.AC,
            Source::READ => match self.input.get(self.cursor) {
                Some(&value) => {
                    self.cursor += 1;
                    value
                }
                None => {
                    self.eof = true;
                    0
                }
            },
            Source::EOF => {
                if self.eof {
                    -1
                } else {
                    0
                }
            }
        }
    }

    fn data_at(&self, address: usize) -> Result<i64, MachineError> {
        match &self.memory[address].kind {
            UnitKind::Data(value) => Ok(*value),
            other => Err(MachineError::TypeMismatch {
                address,
                expected: "data word",
                found: other.name(),
            }),
        }
    }

    fn data_mut(&mut self, address: usize) -> Result<&mut i64, MachineError> {
        match &mut self.memory[address].kind {
            UnitKind::Data(value) => Ok(value),
            other => Err(MachineError::TypeMismatch {
                address,
                expected: "data word",
                found: other.name(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unit::{Operate, Operation};

    fn operate(source: Source, operation: Operation, destination: Destination) -> UnitKind {
        UnitKind::Operate(Operate::new(source, operation, destination))
    }

    fn setup(units: Vec<MemoryUnit>) -> Machine {
        Machine::with_program(&Program::new(units))
    }

    fn setup_op(kind: UnitKind) -> Machine {
        setup(vec![
            MemoryUnit::new(kind),
            MemoryUnit::labeled("X", UnitKind::Data(5)),
        ])
    }

    fn data(vm: &Machine, address: usize) -> i64 {
        match vm.memory[address].kind {
            UnitKind::Data(value) => value,
            _ => panic!("not a data unit"),
        }
    }

    #[test]
    fn store() {
        let mut vm = setup_op(UnitKind::Store("X".into()));
        vm.AC = 42;

        vm.step().unwrap();

        assert_eq!(data(&vm, 1), 42);
        assert_eq!(vm.IP, 1);
    }

    #[test]
    fn add() {
        let mut vm = setup_op(UnitKind::Add("1".into()));
        vm.AC = 10;

        vm.step().unwrap();

        assert_eq!(vm.AC, 15);
        assert_eq!(vm.IP, 1);
    }

    #[test]
    fn store_then_add() {
        let mut vm = setup(vec![
            MemoryUnit::new(UnitKind::Store("V".into())),
            MemoryUnit::new(UnitKind::Add("V".into())),
            MemoryUnit::labeled("V", UnitKind::Data(0)),
        ]);
        vm.AC = 21;

        vm.step().unwrap();
        vm.step().unwrap();

        assert_eq!(vm.AC, 42);
    }

    #[test]
    fn overflow() {
        let mut vm = setup(vec![
            MemoryUnit::new(UnitKind::Add("1".into())),
            MemoryUnit::new(UnitKind::Data(1)),
        ]);
        vm.AC = i64::MAX;

        vm.step().unwrap();

        assert_eq!(vm.AC, i64::MIN);
    }

    #[test]
    fn transfer() {
        let units = vec![
            MemoryUnit::new(UnitKind::Transfer("L".into())),
            MemoryUnit::new(operate(Source::AC, Operation::COPY, Destination::HALT)),
            MemoryUnit::labeled(
                "L",
                operate(Source::AC, Operation::COPY, Destination::ERROR),
            ),
        ];

        let mut vm = setup(units.clone());
        vm.AC = -1;
        vm.step().unwrap();
        assert_eq!(vm.IP, 2);

        let mut vm = setup(units.clone());
        vm.AC = 0;
        vm.step().unwrap();
        assert_eq!(vm.IP, 1);

        let mut vm = setup(units);
        vm.AC = 1;
        vm.step().unwrap();
        assert_eq!(vm.IP, 1);
    }

    #[test]
    fn transfer_checks_operand_when_not_taken() {
        let mut vm = setup_op(UnitKind::Transfer("MISSING".into()));

        let fault = vm.step().unwrap_err();

        assert_eq!(fault.address, 0);
        assert_eq!(
            fault.error,
            MachineError::UnresolvedLabel("MISSING".into())
        );
    }

    #[test]
    fn read_and_eof() {
        let mut vm = setup(vec![
            MemoryUnit::new(operate(Source::READ, Operation::COPY, Destination::AC)),
            MemoryUnit::new(operate(Source::EOF, Operation::COPY, Destination::AC)),
        ]);
        vm.set_input(vec![]);

        vm.step().unwrap();
        assert_eq!(vm.AC, 0);
        assert!(vm.eof);

        vm.step().unwrap();
        assert_eq!(vm.AC, -1);
    }

    #[test]
    fn read_consumes_input_in_order() {
        let mut vm = setup(vec![
            MemoryUnit::new(operate(Source::READ, Operation::COPY, Destination::AC)),
            MemoryUnit::new(operate(Source::READ, Operation::NEGATE, Destination::AC)),
            MemoryUnit::new(operate(Source::EOF, Operation::COPY, Destination::AC)),
        ]);
        vm.set_input(vec![3, 9]);

        vm.step().unwrap();
        assert_eq!(vm.AC, 3);
        vm.step().unwrap();
        assert_eq!(vm.AC, -9);
        vm.step().unwrap();
        assert_eq!(vm.AC, 0);
        assert!(!vm.eof);
    }

    #[test]
    fn clear() {
        let mut vm = setup_op(operate(Source::AC, Operation::CLEAR, Destination::AC));
        vm.AC = 99;

        vm.step().unwrap();

        assert_eq!(vm.AC, 0);
    }

    #[test]
    fn halt() {
        let mut vm = setup_op(operate(Source::AC, Operation::COPY, Destination::HALT));
        vm.AC = 7;

        assert_eq!(vm.run(), Ok(Outcome::Halt(7)));
        assert!(!vm.error_flag);
    }

    #[test]
    fn error() {
        let mut vm = setup_op(operate(Source::AC, Operation::NEGATE, Destination::ERROR));
        vm.AC = 3;

        assert_eq!(vm.run(), Ok(Outcome::Error(-3)));
        assert_eq!(vm.result, Some(-3));
        assert!(vm.error_flag);
    }

    #[test]
    fn store_into_instruction() {
        let mut vm = setup_op(UnitKind::Store("0".into()));

        let fault = vm.step().unwrap_err();

        assert_eq!(
            fault.error,
            MachineError::TypeMismatch {
                address: 0,
                expected: "data word",
                found: "STORE instruction",
            }
        );
    }

    #[test]
    fn execute_data() {
        let mut vm = setup(vec![MemoryUnit::new(UnitKind::Data(1))]);

        let fault = vm.run().unwrap_err();

        assert_eq!(
            fault.error,
            MachineError::TypeMismatch {
                address: 0,
                expected: "instruction",
                found: "data word",
            }
        );
    }

    #[test]
    fn run_off_the_end() {
        let mut vm = setup(vec![MemoryUnit::new(operate(
            Source::AC,
            Operation::COPY,
            Destination::AC,
        ))]);

        let fault = vm.run().unwrap_err();

        assert_eq!(fault.address, 1);
        assert_eq!(
            fault.error,
            MachineError::OutOfRange {
                address: 1,
                size: 1
            }
        );
    }

    #[test]
    fn step_limit() {
        let mut vm = setup(vec![
            MemoryUnit::labeled(
                "LOOP",
                operate(Source::AC, Operation::CLEAR, Destination::AC),
            ),
            MemoryUnit::new(UnitKind::Add("MINUS".into())),
            MemoryUnit::new(UnitKind::Transfer("LOOP".into())),
            MemoryUnit::labeled("MINUS", UnitKind::Data(-1)),
        ]);

        let fault = vm.run_until(100).unwrap_err();

        assert_eq!(fault.error, MachineError::StepLimit(100));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Halt(42).to_string(), "HALT 42");
        assert_eq!(Outcome::Halt(-1).to_string(), "HALT -1");
        assert_eq!(Outcome::Error(-3).to_string(), "ERROR");
    }
}
