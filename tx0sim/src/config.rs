use std::path::PathBuf;

use anyhow::{Context, Result};
use libtx0::DEFAULT_MAX_STEPS;

pub const MAX_STEPS_VAR: &str = "TX0_MAX_STEPS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub program: PathBuf,
    pub listing: Option<PathBuf>,
    pub max_steps: u64,
}

impl Config {
    /// Read the command line and environment, after loading `.env` if one
    /// exists.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_parts(std::env::args().skip(1), std::env::var(MAX_STEPS_VAR).ok())
    }

    pub fn from_parts<I>(mut args: I, max_steps: Option<String>) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let program = args
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::Error::msg("Need a program filename"))?;
        let listing = args.next().map(PathBuf::from);
        let max_steps = match max_steps {
            Some(steps) => steps
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {} value {:?}", MAX_STEPS_VAR, steps))?,
            None => DEFAULT_MAX_STEPS,
        };

        Ok(Self {
            program,
            listing,
            max_steps,
        })
    }
}
