use crate::error::CliError;
use crate::secret_book::SecretBook;
use anyhow::anyhow;
use libatmen::cryptography::{
    combine_secrets, commitment_from_secret, commitment_id_from_secret, compress, derive_mirror, CommitmentId, Point,
    Secret,
};
use libatmen::helpers::decode_hex_array;
use libatmen::operation::{encode_reveal, Selector};
use log::*;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// A commitment point and its id.
pub struct CommitmentReport {
    pub point: Point,
    pub id: CommitmentId,
}

impl CommitmentReport {
    fn from_point(point: Point) -> Result<Self, anyhow::Error> {
        let id = compress(&point)?;
        Ok(Self { point, id })
    }
}

impl Display for CommitmentReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (x, y) = self.point.coordinates().map_err(|_| std::fmt::Error)?;
        writeln!(f, "Qx: 0x{}", hex::encode(x))?;
        writeln!(f, "Qy: 0x{}", hex::encode(y))?;
        write!(f, "Id: {}", self.id)
    }
}

/// Interprets `input` as a hex secret, falling back to a label in the secret book at `book_path`.
pub fn resolve_secret(input: &str, book_path: &Path) -> Result<Secret, anyhow::Error> {
    if let Ok(secret) = Secret::from_hex(input) {
        return Ok(secret);
    }
    let book = match SecretBook::try_load(Some(book_path)) {
        Ok(book) => book,
        Err(CliError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => SecretBook::default(),
        Err(err) => return Err(err.into()),
    };
    match book.get(input) {
        Some(secret) => Ok(secret?),
        None => Err(anyhow!("'{input}' is neither a valid secret nor a label in {}", book_path.display())),
    }
}

pub fn commit(secret: &Secret) -> Result<CommitmentReport, anyhow::Error> {
    CommitmentReport::from_point(commitment_from_secret(secret))
}

pub fn mirror(qx: &str, qy: &str, shared_secret: &Secret) -> Result<CommitmentReport, anyhow::Error> {
    let x = decode_hex_array::<32>(qx).map_err(|e| anyhow!("Invalid Qx: {e}"))?;
    let y = decode_hex_array::<32>(qy).map_err(|e| anyhow!("Invalid Qy: {e}"))?;
    let q = Point::from_coordinates(&x, &y)?;
    debug!("Deriving mirror of {q:?}");
    CommitmentReport::from_point(derive_mirror(&q, shared_secret))
}

pub fn combine(secret: &Secret, shared_secret: &Secret) -> Result<(Secret, CommitmentId), anyhow::Error> {
    let combined = combine_secrets(secret, shared_secret)?;
    let id = commitment_id_from_secret(&combined)?;
    Ok((combined, id))
}

/// Hex call data for a reveal operation, `0x`-prefixed.
pub fn reveal_payload(id: &str, secret: &Secret) -> Result<String, anyhow::Error> {
    let id: CommitmentId = id.parse()?;
    let expected = commitment_id_from_secret(secret)?;
    if expected != id {
        warn!("The secret commits to {expected}, not {id}. The operation will not be authorized.");
    }
    Ok(format!("0x{}", hex::encode(encode_reveal(&id, secret))))
}

pub fn selector(signature: &str) -> Selector {
    Selector::from_signature(signature)
}
