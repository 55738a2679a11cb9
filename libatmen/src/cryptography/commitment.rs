//! Elliptic-curve commitments to swap secrets.
//!
//! A commitment to a secret `s` is the point `Q = s * G`. Commitments are additively homomorphic:
//! `commit(a) + commit(b) == commit(a + b mod n)`, which is what links a swap to its mirror.
//!
//! The registry never stores points. It keys swaps by a [`CommitmentId`], the last 20 bytes of
//! `keccak256(x ‖ y)`, which is the same compression the host ledger applies to public keys when it derives
//! account identifiers. Knowing `s` is then proven by recomputing the id, without any signature verification.

use crate::cryptography::curve::{point_add, scalar_multiply_base, CurveError, Point};
use crate::cryptography::secret::{Secret, SecretError};
use crate::helpers::decode_hex_array;
use log::trace;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt::{Debug, Display};
use std::str::FromStr;
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const COMMITMENT_ID_LENGTH: usize = 20;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommitmentError {
    #[error("Invalid scalar. {0}")]
    InvalidScalar(#[from] SecretError),
    #[error("Invalid point. {0}")]
    InvalidPoint(#[from] CurveError),
    #[error("Invalid commitment id: {0}")]
    InvalidId(String),
}

/// The compressed, fixed-size lookup key of a commitment.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommitmentId(
    #[serde(serialize_with = "crate::helpers::array_to_hex", deserialize_with = "crate::helpers::array_from_hex")]
    [u8; COMMITMENT_ID_LENGTH],
);

impl CommitmentId {
    pub const fn new(bytes: [u8; COMMITMENT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_ID_LENGTH] {
        &self.0
    }

    /// Left-pads the id to a 32-byte word, the way it travels in call data.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[32 - COMMITMENT_ID_LENGTH..].copy_from_slice(&self.0);
        word
    }

    pub fn as_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Constant-time comparison.
    pub fn matches(&self, other: &CommitmentId) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl FromStr for CommitmentId {
    type Err = CommitmentError;

    /// Accepts the bare 20-byte form or the zero-padded 32-byte word form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |e: hex::FromHexError| CommitmentError::InvalidId(format!("{s}: {e}"));
        if crate::helpers::strip_hex_prefix(s).len() == 64 {
            let word: [u8; 32] = decode_hex_array(s).map_err(err)?;
            if word[..32 - COMMITMENT_ID_LENGTH].iter().any(|b| *b != 0) {
                return Err(CommitmentError::InvalidId(format!("{s}: non-zero padding")));
            }
            let mut id = [0u8; COMMITMENT_ID_LENGTH];
            id.copy_from_slice(&word[32 - COMMITMENT_ID_LENGTH..]);
            return Ok(Self(id));
        }
        decode_hex_array(s).map(Self).map_err(err)
    }
}

impl Display for CommitmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Debug for CommitmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommitmentId({})", self.as_hex())
    }
}

/// Returns `secret * G`.
pub fn commitment_from_secret(secret: &Secret) -> Point {
    scalar_multiply_base(secret.as_scalar())
}

/// Like [`commitment_from_secret`], for raw big-endian bytes that have not been validated yet.
pub fn commitment_from_secret_bytes(secret: &[u8; 32]) -> Result<Point, CommitmentError> {
    let secret = Secret::from_bytes(secret)?;
    Ok(commitment_from_secret(&secret))
}

/// Compresses a commitment point to its id: the last 20 bytes of `keccak256(x ‖ y)`.
pub fn compress(q: &Point) -> Result<CommitmentId, CommitmentError> {
    let xy = q.to_uncompressed_xy()?;
    Ok(hash_xy(&xy))
}

fn hash_xy(xy: &[u8; 64]) -> CommitmentId {
    let digest = Keccak256::digest(xy);
    let mut id = [0u8; COMMITMENT_ID_LENGTH];
    id.copy_from_slice(&digest[32 - COMMITMENT_ID_LENGTH..]);
    CommitmentId(id)
}

/// The id a swap locked by `secret` is opened under.
pub fn commitment_id_from_secret(secret: &Secret) -> Result<CommitmentId, CommitmentError> {
    compress(&commitment_from_secret(secret))
}

/// Returns `Q + shared_secret * G`, the mirror of commitment `Q`.
///
/// Whoever knows the secret behind `Q` and `shared_secret` can open the mirror with
/// [`combine_secrets`]. The link between the two commitments is never stored anywhere.
pub fn derive_mirror(q: &Point, shared_secret: &Secret) -> Point {
    point_add(q, &commitment_from_secret(shared_secret))
}

/// `(secret + shared_secret) mod n`, the secret that opens the mirror commitment.
pub fn combine_secrets(secret: &Secret, shared_secret: &Secret) -> Result<Secret, CommitmentError> {
    let combined = *secret.as_scalar() + *shared_secret.as_scalar();
    Ok(Secret::from_scalar(combined)?)
}

/// Checks that `secret` opens the commitment compressed to `id`.
///
/// Equality of the recomputed id is the whole authorization proof.
pub fn verify_reveal(id: &CommitmentId, secret: &Secret) -> bool {
    let valid = matches!(commitment_id_from_secret(secret), Ok(candidate) if candidate.matches(id));
    trace!("Reveal check for {id}: {}", if valid { "valid" } else { "mismatch" });
    valid
}
