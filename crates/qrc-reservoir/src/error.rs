//! Error types for reservoir circuit construction.

use qrc_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or binding a reservoir circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReservoirError {
    /// Fewer than one layer requested.
    #[error("num_layers must be at least 1, got {0}")]
    InvalidLayerCount(u32),

    /// Fewer than one input qubit requested.
    #[error("num_input must be at least 1, got {0}")]
    InvalidInputCount(u32),

    /// Requested sizes do not fit the circuit's index space.
    #[error("Circuit too large: {0}")]
    CircuitTooLarge(String),

    /// Hamiltonian coefficients are malformed.
    #[error("Invalid Hamiltonian parameters: {0}")]
    InvalidHamiltonian(String),

    /// Feature matrix does not match layers x input qubits.
    #[error("Feature shape mismatch: {0}")]
    FeatureShape(String),

    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised by the circuit IR.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for reservoir operations.
pub type ReservoirResult<T> = Result<T, ReservoirError>;
