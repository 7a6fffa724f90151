//! Which networks a run operates on and how to reach them.

pub mod directory;
pub mod target;

pub use directory::{KNOWN_NETWORKS, NetworkDirectory, ResolvedNetwork};
pub use target::{NetworkTarget, TargetNetworks};
