pub mod audit;
pub mod config;
pub mod error;
pub mod network;
pub mod recipients;
pub mod registry;

pub use error::ScatterError;

/// Emits an info-level event that terminal formatters render as a success line.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "scatter::success", $($arg)*)
    };
}
