use crate::cryptography::{CommitmentId, Secret, COMMITMENT_ID_LENGTH};
use crate::error::ReadError;
use crate::operation::error::OperationError;
use crate::operation::selector::{Selector, REVEAL_SELECTOR};
use zeroize::Zeroizing;

/// The exact length of reveal call data: a 32-byte id word, a 32-byte secret word and the 4-byte selector.
pub const REVEAL_CALL_LENGTH: usize = 68;

const ID_PADDING: usize = 32 - COMMITMENT_ID_LENGTH;

/// The decoded body of reveal call data.
///
/// Decoding only checks the layout. The id word may carry non-zero padding and the secret word may be out of range;
/// both are reported by the accessors so that the validator can answer "not authorized" rather than "malformed".
#[derive(Clone)]
pub struct RevealCall {
    id_word: [u8; 32],
    secret: Zeroizing<[u8; 32]>,
}

impl RevealCall {
    pub fn new(id: &CommitmentId, secret: &Secret) -> Self {
        Self { id_word: id.to_word(), secret: secret.to_bytes() }
    }

    /// The commitment id, or `None` if the high 12 bytes of the id word are not zero.
    pub fn commitment_id(&self) -> Option<CommitmentId> {
        if self.id_word[..ID_PADDING].iter().any(|b| *b != 0) {
            return None;
        }
        let mut id = [0u8; COMMITMENT_ID_LENGTH];
        id.copy_from_slice(&self.id_word[ID_PADDING..]);
        Some(CommitmentId::new(id))
    }

    /// The revealed secret, or `None` if the word is zero or not smaller than the group order.
    pub fn secret(&self) -> Option<Secret> {
        Secret::from_bytes(&self.secret).ok()
    }

    /// `id word ‖ secret ‖ selector`, always [`REVEAL_CALL_LENGTH`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(REVEAL_CALL_LENGTH);
        data.extend_from_slice(&self.id_word);
        data.extend_from_slice(self.secret.as_slice());
        data.extend_from_slice(REVEAL_SELECTOR.as_bytes());
        data
    }
}

impl std::fmt::Debug for RevealCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealCall")
            .field("id_word", &hex::encode(self.id_word))
            .field("secret", &"**redacted**")
            .finish()
    }
}

/// A decoded operation call.
#[derive(Debug, Clone)]
pub enum OperationCall {
    Reveal(RevealCall),
    /// Well-formed call data whose trailing selector is not one the registry sponsors.
    Unsupported(Selector),
}

impl OperationCall {
    /// Splits `call_data` into its words and trailing selector.
    ///
    /// Only the reveal layout is understood, so anything that is not exactly [`REVEAL_CALL_LENGTH`] bytes long is
    /// malformed.
    pub fn decode(call_data: &[u8]) -> Result<Self, OperationError> {
        if call_data.len() != REVEAL_CALL_LENGTH {
            let msg = format!("expected {REVEAL_CALL_LENGTH} bytes, got {}", call_data.len());
            return Err(ReadError::new("call_data", msg).into());
        }
        let selector = read_array::<4>(call_data, 64, "selector")?;
        let selector = Selector::new(selector);
        if selector != REVEAL_SELECTOR {
            return Ok(OperationCall::Unsupported(selector));
        }
        let id_word = read_array::<32>(call_data, 0, "id")?;
        let secret = Zeroizing::new(read_array::<32>(call_data, 32, "secret")?);
        Ok(OperationCall::Reveal(RevealCall { id_word, secret }))
    }

    pub fn selector(&self) -> Selector {
        match self {
            OperationCall::Reveal(_) => REVEAL_SELECTOR,
            OperationCall::Unsupported(selector) => *selector,
        }
    }
}

fn read_array<const N: usize>(data: &[u8], offset: usize, field: &str) -> Result<[u8; N], ReadError> {
    data.get(offset..offset + N)
        .and_then(|slice| <[u8; N]>::try_from(slice).ok())
        .ok_or_else(|| ReadError::new(field, format!("expected {N} bytes at offset {offset}")))
}

/// Builds reveal call data for closing the swap at `id` with `secret`.
pub fn encode_reveal(id: &CommitmentId, secret: &Secret) -> Vec<u8> {
    RevealCall::new(id, secret).encode()
}
