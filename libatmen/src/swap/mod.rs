//! The swap registry: a keyed store of escrowed value that is paid to the recipient on reveal of the commitment's
//! secret, or refunded to the opener after the timelock.

pub mod config;
pub mod error;
pub mod events;
pub mod record;
pub mod registry;

pub use config::{RegistryConfig, DEFAULT_MINIMUM_VALUE};
pub use error::SwapError;
pub use events::SwapEvent;
pub use record::{CallContext, OpenRequest, Swap, SwapState};
pub use registry::SwapRegistry;
