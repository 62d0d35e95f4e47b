//! Error types for the QASM3 emitter.

use qrc_ir::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while emitting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// An operation touches a qubit that belongs to no register.
    #[error("Qubit {0} is not part of any quantum register")]
    UnmappedQubit(QubitId),

    /// An operation touches a classical bit that belongs to no register.
    #[error("Classical bit {0} is not part of any classical register")]
    UnmappedClbit(ClbitId),

    /// A name cannot be turned into a QASM identifier.
    #[error("Cannot form a QASM identifier from '{0}'")]
    InvalidIdentifier(String),

    /// Two distinct names map to the same QASM identifier.
    #[error("Names '{first}' and '{second}' both map to identifier '{ident}'")]
    IdentifierCollision {
        first: String,
        second: String,
        ident: String,
    },
}

/// Result type for emit operations.
pub type EmitResult<T> = Result<T, EmitError>;
