use libtx0::Program;
use log::warn;
use tx0dbg::Listing;

pub use parser::{LoadError, Mnemonic};

pub mod parser;

/// Load a program from text into a memory image.
///
/// # Errors
///
/// If a line can't be parsed
pub fn load_program(program_text: &str) -> Result<Program, LoadError> {
    Ok(load_with_listing(program_text, "")?.0)
}

pub fn load_with_listing(
    program_text: &str,
    name: &str,
) -> Result<(Program, Listing), LoadError> {
    let lines = parser::parse_program(program_text)?;

    let mut units = Vec::new();
    let mut listing = Listing::new(name);

    for line in lines {
        let Some(unit) = line.unit else { continue };
        let address = units.len();
        if let Some(label) = &unit.label {
            if !listing.add_label(label.clone(), address) {
                warn!(
                    "[{}] Label {} already defined, references resolve to address {}",
                    line.line_no,
                    label,
                    listing.address_for_label(label).unwrap_or_default()
                );
            }
        }
        listing.add_line(address, line.text.trim().to_owned(), line.line_no);
        units.push(unit);
    }

    Ok((Program::new(units), listing))
}
