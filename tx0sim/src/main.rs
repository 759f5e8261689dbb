use std::{
    fs,
    io::{self, Read},
};

use anyhow::{Context, Result};
use log::info;
use tx0asm::load_with_listing;
use tx0sim::{run_session, split_batches, Config};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let program_text = fs::read_to_string(&config.program)
        .with_context(|| format!("Couldn't read {}", config.program.display()))?;
    let name = config
        .program
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (program, listing) = load_with_listing(&program_text, &name)?;
    info!("Loaded {} with {} units", name, program.len());

    if let Some(path) = &config.listing {
        fs::write(path, listing.to_string_pretty()?)?;
        info!("Wrote listing to {}", path.display());
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let batches = split_batches(&input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_session(&program, &listing, batches, config.max_steps, &mut out)
}
