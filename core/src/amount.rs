use std::ops::RangeInclusive;

use ethers::types::U256;
use ethers::utils::format_units;
use rand::Rng;

/// Draws whole-token transfer amounts uniformly from an inclusive range.
#[derive(Debug, Clone)]
pub struct AmountPicker {
    range: RangeInclusive<u64>,
}

impl AmountPicker {
    pub fn new(range: RangeInclusive<u64>) -> Self {
        Self { range }
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.random_range(self.range.clone())
    }
}

/// Converts whole tokens to the contract's base units: `tokens * 10^decimals`.
///
/// Returns `None` when the result does not fit in 256 bits.
pub fn to_base_units(tokens: u64, decimals: u8) -> Option<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .and_then(|scale| scale.checked_mul(U256::from(tokens)))
}

/// Human readable rendering of a base-unit amount.
pub fn display_units(amount: U256, decimals: u8) -> String {
    format_units(amount, u32::from(decimals)).unwrap_or_else(|_| amount.to_string())
}
