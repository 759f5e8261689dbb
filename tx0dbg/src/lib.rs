use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
pub use serde_json::Error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListingLine {
    pub address: usize,
    pub line_number: usize,
    pub text: String,
}

/// Source-level debug info for a loaded program: which line produced each
/// address, and where each label landed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub lines: Vec<ListingLine>,
    pub labels: IndexMap<String, usize>,
}

impl Listing {
    pub fn new(name: &str) -> Self {
        Listing {
            name: name.into(),
            lines: Vec::new(),
            labels: IndexMap::new(),
        }
    }

    /// Record a label. Returns false, leaving the first address in place, if
    /// the label was already defined.
    pub fn add_label(&mut self, label: String, address: usize) -> bool {
        if self.labels.contains_key(&label) {
            return false;
        }
        self.labels.insert(label, address);
        true
    }

    pub fn add_line(&mut self, address: usize, text: String, line_number: usize) {
        self.lines.push(ListingLine {
            address,
            text,
            line_number,
        });
    }

    /// Lines are added in address order, so the address is also the index.
    pub fn line_for(&self, address: usize) -> Option<&ListingLine> {
        self.lines.get(address).filter(|line| line.address == address)
    }

    pub fn address_for_label(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    pub fn to_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_string(listing: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(listing)
    }
}
