//! secp256k1 group arithmetic.
//!
//! All arithmetic is delegated to `k256`, whose scalar multiplication is constant-time with respect to the
//! scalar's bit pattern and whose projective addition formulas are complete (the point at infinity and the
//! doubling case need no branches). Secrets flow through [`scalar_multiply`], so that property matters here.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use thiserror::Error;

/// The size in bytes of a field element or scalar.
pub const SCALAR_SIZE: usize = 32;

/// The prime modulus of the base field, p = 2^256 - 2^32 - 977, big-endian.
pub const FIELD_MODULUS: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// The order n of the group generated by G, big-endian.
pub const GROUP_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xba, 0xae, 0xdc,
    0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("The coordinates do not describe a point on the secp256k1 curve.")]
    InvalidPoint,
    #[error("The point at infinity has no affine coordinates.")]
    PointAtInfinity,
}

/// A point on secp256k1, or the point at infinity.
///
/// Values of this type can only be produced by curve arithmetic or by [`Point::from_coordinates`], which rejects
/// anything that fails the curve equation. Every `Point` is therefore on the curve.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Point(AffinePoint);

impl Point {
    pub fn generator() -> Self {
        Point(AffinePoint::GENERATOR)
    }

    pub fn infinity() -> Self {
        Point(AffinePoint::IDENTITY)
    }

    pub fn is_infinity(&self) -> bool {
        self.0 == AffinePoint::IDENTITY
    }

    /// Accept an externally supplied point given as big-endian affine coordinates.
    pub fn from_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Result<Self, CurveError> {
        let encoded = EncodedPoint::from_affine_coordinates(&FieldBytes::from(*x), &FieldBytes::from(*y), false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(Point)
            .ok_or(CurveError::InvalidPoint)
    }

    /// Big-endian affine coordinates `(x, y)`.
    pub fn coordinates(&self) -> Result<([u8; 32], [u8; 32]), CurveError> {
        let encoded = self.0.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => {
                let mut xb = [0u8; 32];
                let mut yb = [0u8; 32];
                xb.copy_from_slice(x);
                yb.copy_from_slice(y);
                Ok((xb, yb))
            }
            _ => Err(CurveError::PointAtInfinity),
        }
    }

    /// The 64-byte concatenation `x ‖ y`.
    pub fn to_uncompressed_xy(&self) -> Result<[u8; 64], CurveError> {
        let (x, y) = self.coordinates()?;
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&x);
        out[32..].copy_from_slice(&y);
        Ok(out)
    }

    pub(crate) fn as_affine(&self) -> &AffinePoint {
        &self.0
    }
}

impl From<ProjectivePoint> for Point {
    fn from(p: ProjectivePoint) -> Self {
        Point(p.to_affine())
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coordinates() {
            Ok((x, y)) => f
                .debug_struct("Point")
                .field("x", &format!("0x{}", hex::encode(x)))
                .field("y", &format!("0x{}", hex::encode(y)))
                .finish(),
            Err(_) => write!(f, "Point(infinity)"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PointRepr {
    #[serde(serialize_with = "crate::helpers::array_to_hex", deserialize_with = "crate::helpers::array_from_hex")]
    x: [u8; 32],
    #[serde(serialize_with = "crate::helpers::array_to_hex", deserialize_with = "crate::helpers::array_from_hex")]
    y: [u8; 32],
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let (x, y) = self.coordinates().map_err(serde::ser::Error::custom)?;
        PointRepr { x, y }.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<De: Deserializer<'de>>(de: De) -> Result<Self, De::Error> {
        let repr = PointRepr::deserialize(de)?;
        Point::from_coordinates(&repr.x, &repr.y).map_err(serde::de::Error::custom)
    }
}

/// Computes `k * P`.
pub fn scalar_multiply(k: &Scalar, p: &Point) -> Point {
    Point::from(ProjectivePoint::from(*p.as_affine()) * k)
}

/// Computes `k * G`, using the precomputed generator tables.
pub fn scalar_multiply_base(k: &Scalar) -> Point {
    Point::from(ProjectivePoint::GENERATOR * k)
}

/// Computes `P + Q` under the group law, including `P + O = P` and `P + P = 2P`.
pub fn point_add(p: &Point, q: &Point) -> Point {
    Point::from(ProjectivePoint::from(*p.as_affine()) + ProjectivePoint::from(*q.as_affine()))
}

pub fn point_negate(p: &Point) -> Point {
    Point::from(-ProjectivePoint::from(*p.as_affine()))
}

/// Checks whether big-endian affine coordinates satisfy `y^2 = x^3 + 7 (mod p)` with both coordinates in range.
pub fn is_on_curve(x: &[u8; 32], y: &[u8; 32]) -> bool {
    Point::from_coordinates(x, y).is_ok()
}
