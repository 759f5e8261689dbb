use std::io::Write;

use anyhow::{Context, Result};
use libtx0::{BatchRunner, Program};
use log::{error, info};
use tx0dbg::Listing;

use crate::input::Batch;

/// Run every batch and write one outcome line per batch, each preceded by
/// the batch's delimiter line.
///
/// # Errors
///
/// If the program can never stop, or faults on any batch. Outcomes for
/// earlier batches have already been written by then.
pub fn run_session<W: Write>(
    program: &Program,
    listing: &Listing,
    batches: Vec<Batch>,
    max_steps: u64,
    out: &mut W,
) -> Result<()> {
    let runner = BatchRunner::new(program)?.with_max_steps(max_steps);
    info!("Running {} batch(es), {} step limit", batches.len(), max_steps);

    for (idx, batch) in batches.into_iter().enumerate() {
        if let Some(header) = &batch.header {
            writeln!(out, "{}", header)?;
        }

        match runner.run_batch(batch.values) {
            Ok(outcome) => writeln!(out, "{}", outcome)?,
            Err(fault) => {
                let at = listing
                    .line_for(fault.address)
                    .map(|line| format!(" on line {} ({})", line.line_number, line.text))
                    .unwrap_or_default();
                error!("Batch {}: {}{}", idx + 1, fault, at);
                return Err(fault).with_context(|| format!("Batch {} faulted{}", idx + 1, at));
            }
        }
    }

    Ok(())
}
