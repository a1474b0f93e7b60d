//! Command implementations for the fob-bridge CLI.
//!
//! Each command lives in its own module and exposes an `execute` function
//! taking the parsed arguments and the project root.

pub mod asset;
pub mod check;
pub mod csp;
pub mod resolve;
pub mod serve;
pub(crate) mod utils;

pub use asset::execute as asset_execute;
pub use check::execute as check_execute;
pub use csp::execute as csp_execute;
pub use resolve::execute as resolve_execute;
pub use serve::execute as serve_execute;
