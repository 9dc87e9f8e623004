use thiserror::Error;

use crate::engine::EngineError;

/// Failures surfaced to the host. `Display` yields the exact reply text.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("error: Engine not initialized")]
    NotInitialized,
    #[error("error: Thread init failed - {0}")]
    Provisioning(String),
    #[error("error: Null command")]
    NullCommand,
    #[error("error: Null FEN")]
    NullFen,
    #[error("error: Janggi variant not found")]
    VariantNotFound,
    #[error("error: No root moves")]
    NoRootMoves,
    #[error("error: Exception - {0}")]
    Engine(#[from] EngineError),
    #[error("error: Exception - {0}")]
    Panic(String),
    #[error("error: Unknown exception")]
    UnknownPanic,
}

impl BridgeError {
    /// Classify a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        if let Some(s) = payload.downcast_ref::<&str>() {
            BridgeError::Panic((*s).to_string())
        } else if let Some(s) = payload.downcast_ref::<String>() {
            BridgeError::Panic(s.clone())
        } else {
            BridgeError::UnknownPanic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_match_the_host_contract() {
        assert_eq!(BridgeError::NotInitialized.to_string(), "error: Engine not initialized");
        assert_eq!(
            BridgeError::Provisioning("no threads".into()).to_string(),
            "error: Thread init failed - no threads"
        );
        assert_eq!(BridgeError::NullFen.to_string(), "error: Null FEN");
        assert_eq!(
            BridgeError::Engine(EngineError::WorkerLost).to_string(),
            "error: Exception - Search worker disconnected"
        );
    }

    #[test]
    fn panic_payloads_are_classified() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("index out of range");
        assert_eq!(
            BridgeError::from_panic(payload.as_ref()).to_string(),
            "error: Exception - index out of range"
        );
        let payload: Box<dyn std::any::Any + Send> = Box::new(42_i32);
        assert_eq!(
            BridgeError::from_panic(payload.as_ref()).to_string(),
            "error: Unknown exception"
        );
    }
}
