pub mod address;
pub mod amount;
pub mod cryptography;
pub mod error;
pub mod helpers;
pub mod host;
pub mod operation;
pub mod swap;

pub use address::Address;
pub use amount::Amount;
pub use helpers::Timestamp;

#[cfg(test)]
mod tests;
