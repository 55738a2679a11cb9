//! Cryptographic primitives
//!
//! This module contains the secp256k1 group arithmetic and the commitment scheme built on it. It is a fairly
//! low-level module and as such is ignorant of swap records, registries and operations.

pub mod commitment;
pub mod curve;
pub mod secret;

pub use commitment::{
    combine_secrets, commitment_from_secret, commitment_from_secret_bytes, commitment_id_from_secret, compress,
    derive_mirror, verify_reveal, CommitmentError, CommitmentId, COMMITMENT_ID_LENGTH,
};
pub use curve::{is_on_curve, point_add, scalar_multiply, CurveError, Point};
pub use secret::{Secret, SecretError};
