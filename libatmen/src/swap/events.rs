use crate::cryptography::CommitmentId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Emitted by the registry on every successful state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    Open(CommitmentId),
    Close(CommitmentId),
    Expire(CommitmentId),
}

impl SwapEvent {
    pub fn id(&self) -> &CommitmentId {
        match self {
            SwapEvent::Open(id) | SwapEvent::Close(id) | SwapEvent::Expire(id) => id,
        }
    }
}

impl Display for SwapEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapEvent::Open(id) => write!(f, "Open({id})"),
            SwapEvent::Close(id) => write!(f, "Close({id})"),
            SwapEvent::Expire(id) => write!(f, "Expire({id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_roundtrip_through_ron() {
        let id: CommitmentId = "0xb3dca5f0cab69500d9165dd025c3a7ff82dca55f".parse().unwrap();
        let events = vec![SwapEvent::Open(id), SwapEvent::Close(id)];
        let serialized = ron::to_string(&events).unwrap();
        let back: Vec<SwapEvent> = ron::from_str(&serialized).unwrap();
        assert_eq!(back, events);
        assert_eq!(back[1].id(), &id);
        assert_eq!(SwapEvent::Expire(id).to_string(), "Expire(0xb3dca5f0cab69500d9165dd025c3a7ff82dca55f)");
    }
}
