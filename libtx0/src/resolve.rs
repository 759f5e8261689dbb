use crate::error::MachineError;
use crate::unit::MemoryUnit;

/// Resolve an operand token to a memory index.
///
/// Numeric tokens are used directly as addresses. Anything else is looked up
/// as a label, first match in address order.
///
/// # Errors
///
/// `OutOfRange` if a numeric address doesn't fit in memory, `UnresolvedLabel`
/// if no unit carries the label.
pub fn resolve(memory: &[MemoryUnit], operand: &str) -> Result<usize, MachineError> {
    if let Ok(address) = operand.parse::<i64>() {
        return usize::try_from(address)
            .ok()
            .filter(|&idx| idx < memory.len())
            .ok_or(MachineError::OutOfRange {
                address,
                size: memory.len(),
            });
    }

    memory
        .iter()
        .position(|unit| unit.is_labeled(operand))
        .ok_or_else(|| MachineError::UnresolvedLabel(operand.into()))
}
