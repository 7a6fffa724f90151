//! Distribution engine: ledger access, amount selection, pacing and the
//! per-network control loop that ties them together.

pub mod amount;
pub mod distributor;
pub mod ledger;
pub mod pacing;
pub mod preflight;
