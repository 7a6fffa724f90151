//! # Recipient Set
//!
//! Turns the raw recipient file (one address per line) into the working set
//! of a run: trimmed, validated, deduplicated and, when the file holds more
//! addresses than the cap, a uniform random sample of it.

use std::collections::HashSet;
use std::path::Path;

use ethers::types::Address;
use ethers::utils::to_checksum;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ScatterError;

/// Validated, duplicate-free recipients shared by every network of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientSet {
    addresses: Vec<Address>,
}

impl RecipientSet {
    /// Builds the set from raw lines. Invalid and blank entries are dropped.
    ///
    /// When more than `cap` addresses survive validation the whole set is
    /// shuffled and the first `cap` entries are kept, so the sample does not
    /// depend on the order of the input file.
    pub fn build<'a, I, R>(raw: I, cap: usize, rng: &mut R) -> Result<Self, ScatterError>
    where
        I: IntoIterator<Item = &'a str>,
        R: Rng + ?Sized,
    {
        let mut seen: HashSet<Address> = HashSet::new();
        let mut addresses: Vec<Address> = raw
            .into_iter()
            .filter_map(parse_address)
            .filter(|addr| seen.insert(*addr))
            .collect();

        if addresses.is_empty() {
            return Err(ScatterError::NoValidRecipients);
        }

        if addresses.len() > cap {
            addresses.shuffle(rng);
            addresses.truncate(cap);
        }

        Ok(Self { addresses })
    }

    /// Reads the newline separated recipient file at `path`.
    pub fn load<R>(path: &Path, cap: usize, rng: &mut R) -> Result<Self, ScatterError>
    where
        R: Rng + ?Sized,
    {
        if !path.exists() {
            return Err(ScatterError::MissingRecipientSource(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::build(raw.lines(), cap, rng)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }
}

/// Parses a 40 hex digit account address, with or without a lowercase `0x`.
///
/// Single-case addresses are accepted as is. Mixed-case input must carry a
/// valid EIP-55 checksum.
pub fn parse_address(raw: &str) -> Option<Address> {
    let raw = raw.trim();
    let body = raw.strip_prefix("0x").unwrap_or(raw);
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let addr: Address = body.parse().ok()?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&addr, None)[2..] != *body {
        return None;
    }

    Some(addr)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
