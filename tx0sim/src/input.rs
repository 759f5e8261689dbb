use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

/// One block of input values, with the delimiter line that opened it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Batch {
    pub header: Option<String>,
    pub values: Vec<i64>,
}

impl Batch {
    fn is_empty(&self) -> bool {
        self.header.is_none() && self.values.is_empty()
    }
}

fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split input text into batches. Integer lines are values; any other
/// non-blank line starts a new batch.
///
/// # Errors
///
/// If an integer line doesn't fit in a machine word
pub fn split_batches(input: &str) -> Result<Vec<Batch>> {
    let mut batches = Vec::new();
    let mut current = Batch::default();

    for (lineno, line) in input.lines().enumerate() {
        let normalized = normalize(line);
        if normalized.is_empty() {
            continue;
        }

        if INTEGER_REGEX.is_match(&normalized) {
            let value = normalized
                .parse::<i64>()
                .map_err(|e| anyhow!("[{}] {}: {}", lineno + 1, normalized, e))?;
            current.values.push(value);
        } else {
            if !current.is_empty() {
                batches.push(current);
            }
            current = Batch {
                header: Some(line.trim_end().to_owned()),
                values: Vec::new(),
            };
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }

    Ok(batches)
}
