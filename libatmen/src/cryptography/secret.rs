use crate::cryptography::curve::SCALAR_SIZE;
use crate::helpers::strip_hex_prefix;
use k256::elliptic_curve::PrimeField;
use k256::{NonZeroScalar, Scalar};
use rand_core::{CryptoRng, RngCore};
use std::fmt::Debug;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SecretError {
    #[error("The secret must be a non-zero scalar smaller than the curve order.")]
    InvalidScalar,
    #[error("A secret is exactly 32 bytes (64 hex characters).")]
    InvalidStringLength,
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A commitment secret: a scalar `s` with `0 < s < n`.
///
/// Out-of-range values are rejected rather than reduced, so a given commitment has exactly one valid 32-byte
/// secret encoding. The scalar is zeroized on drop, so cloning is safe.
#[derive(Clone)]
pub struct Secret(Zeroizing<Scalar>);

impl Secret {
    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let s = NonZeroScalar::random(rng);
        Self(Zeroizing::new(*s.as_ref()))
    }

    /// Parse a big-endian 32-byte secret.
    pub fn from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self, SecretError> {
        let scalar = Option::<Scalar>::from(Scalar::from_repr((*bytes).into())).ok_or(SecretError::InvalidScalar)?;
        Self::from_scalar(scalar)
    }

    pub fn from_scalar(scalar: Scalar) -> Result<Self, SecretError> {
        if bool::from(scalar.is_zero()) {
            return Err(SecretError::InvalidScalar);
        }
        Ok(Self(Zeroizing::new(scalar)))
    }

    pub fn from_hex(hex: &str) -> Result<Self, SecretError> {
        let hex = strip_hex_prefix(hex);
        if hex.len() != 2 * SCALAR_SIZE {
            return Err(SecretError::InvalidStringLength);
        }
        let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
        hex::decode_to_slice(hex, bytes.as_mut_slice())?;
        Self::from_bytes(&bytes)
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    /// Big-endian encoding. The caller is responsible for the returned copy.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        let mut out = Zeroizing::new([0u8; SCALAR_SIZE]);
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Warning! The result contains the secret in the clear.
    pub fn as_hex(&self) -> String {
        hex::encode(self.to_bytes().as_slice())
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Secret {}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(**redacted**)")
    }
}
