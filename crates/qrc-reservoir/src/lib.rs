//! Quantum reservoir computing circuits.
//!
//! A reservoir circuit encodes one classical feature vector per layer on an
//! `input` register, lets the joint `input` + `hidden` system evolve for one
//! Trotter step of a fixed Hamiltonian, and resets the input register before
//! the next layer. The hidden register is never reset, so it carries a
//! fading memory of earlier layers. All qubits are measured at the end.
//!
//! # Example
//!
//! ```rust
//! use qrc_reservoir::{CircuitAssembler, HamiltonianParams, build_circuit};
//!
//! let h = HamiltonianParams::new(0.1, 0.5, 0.2);
//! let circuit = build_circuit(2, 1, 1, h).unwrap();
//!
//! assert_eq!(circuit.name(), "reservoir");
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.parameters(), &["theta[0]".to_string(), "theta[1]".to_string()]);
//!
//! // Bind one feature row per layer.
//! let assembler = CircuitAssembler::new(2, 1, 1, h).unwrap();
//! let bound = assembler.bind_features(&circuit, &[[0.3], [1.2]]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod hamiltonian;
pub mod layer;

pub use assembler::{
    CircuitAssembler, DEFAULT_CIRCUIT_NAME, DEFAULT_PARAMETER_PREFIX, HIDDEN_REGISTER,
    INPUT_REGISTER, MAX_OPERATIONS, MAX_PARAMETERS, MAX_QUBITS, RESET_LABEL, build_circuit,
};
pub use config::{ConfigOverrides, ReservoirConfig};
pub use error::{ReservoirError, ReservoirResult};
pub use hamiltonian::HamiltonianParams;
pub use layer::{ENCODING_LABEL, EVOLUTION_LABEL, build_layer};
