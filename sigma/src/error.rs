use thiserror::Error;

/// Result alias used throughout the crate
pub type SigmaResult<T> = Result<T, SigmaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigmaError {
    // ==========================================
    // INPUT VALIDATION ERRORS
    // ==========================================
    #[error("Invalid master key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Unsupported denomination: {0}")]
    UnsupportedDenomination(String),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedProtocolVersion(u32),

    #[error("Malformed anonymity set entry at position {index}: {reason}")]
    MalformedAnonymitySetEntry { index: usize, reason: String },

    #[error("Invalid anonymity set size {size} - must hold between 1 and {max} coins")]
    InvalidAnonymitySetSize { size: usize, max: usize },

    #[error("Invalid spend metadata: {0}")]
    InvalidSpendMetadata(String),

    #[error("Malformed spend proof: {0}")]
    MalformedProof(String),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    // ==========================================
    // VERIFICATION ERRORS
    // ==========================================
    #[error("Spend proof failed verification")]
    ProofVerificationFailed,

    // ==========================================
    // CONSTRUCTION ERRORS
    // ==========================================
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Coin derivation failed: {0}")]
    Derivation(String),
}

impl SigmaError {
    /// Caller supplied something malformed; detected before any proving work.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SigmaError::InvalidKeyMaterial(_)
                | SigmaError::UnsupportedDenomination(_)
                | SigmaError::UnsupportedProtocolVersion(_)
                | SigmaError::MalformedAnonymitySetEntry { .. }
                | SigmaError::InvalidAnonymitySetSize { .. }
                | SigmaError::InvalidSpendMetadata(_)
                | SigmaError::MalformedProof(_)
                | SigmaError::InvalidHex(_)
        )
    }

    /// Internal arithmetic or encoding failure. Points at a broken dependency,
    /// not at user input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SigmaError::SerializationError(_) | SigmaError::Derivation(_)
        )
    }

    pub fn is_verification_failure(&self) -> bool {
        matches!(self, SigmaError::ProofVerificationFailed)
    }
}
