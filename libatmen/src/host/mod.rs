//! Capabilities the swap registry borrows from its host ledger: moving assets and reading the clock.
//!
//! The traits live in [`traits`]. [`memory_impl`] has in-memory implementations used by tests, simulations and
//! anyone embedding a registry outside of a real execution environment.

pub mod error;
pub mod memory_impl;
pub mod traits;

pub use error::LedgerError;
pub use memory_impl::{InMemoryLedger, ManualClock, SystemClock};
pub use traits::{Asset, AssetLedger, Clock};
