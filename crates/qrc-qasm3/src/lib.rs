//! `OpenQASM` 3 emitter for reservoir circuits
//!
//! Serializes a [`qrc_ir::Circuit`] into `OpenQASM` 3.0 text that downstream
//! toolchains can execute or transpile.
//!
//! | Circuit element | QASM3 form |
//! |-----------------|------------|
//! | Unbound parameter `theta[3]` | `input float[64] theta_3;` |
//! | Quantum register `hidden` of size 4 | `qubit[4] hidden;` |
//! | Register named with a reserved word, e.g. `input` | `qubit[n] input_;` |
//! | Labeled barrier | `// label` followed by `barrier ...;` |
//! | `rxx` gate | inline `gate rxx(theta) a, b { ... }` definition |
//! | Measurement of all qubits | one `meas[i] = measure reg[j];` line per qubit |
//!
//! # Example
//!
//! ```rust
//! use qrc_ir::{Circuit, ParameterVector};
//! use qrc_qasm3::emit;
//!
//! let mut circuit = Circuit::new("example");
//! let q = circuit.add_qreg("q", 1).unwrap();
//! let theta = ParameterVector::new("theta", 1);
//! circuit.ry(&theta[0], q[0]).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("input float[64] theta_0;"));
//! assert!(qasm.contains("ry(theta_0) q[0];"));
//! assert!(qasm.contains("meas[0] = measure q[0];"));
//! ```

mod emitter;
mod error;

pub use emitter::{emit, sanitize_identifier};
pub use error::{EmitError, EmitResult};
