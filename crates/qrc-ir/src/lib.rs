//! Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures the reservoir builder
//! appends into: named registers, symbolic parameters, the rotation gate
//! set, barriers, resets and measurement.
//!
//! # Overview
//!
//! The circuit IR uses a DAG (Directed Acyclic Graph) representation internally,
//! which gives wire validation and depth for free. The high-level [`Circuit`]
//! API provides a fluent builder and a parameter table that maps each symbolic
//! parameter name to the operations that reference it.
//!
//! # Core Components
//!
//! - **Qubits and Registers**: [`QubitId`], [`ClbitId`], [`QuantumRegister`],
//!   [`ClassicalRegister`]
//! - **Gates**: [`StandardGate`] (`Ry`, `Rz`, `RXX`)
//! - **Parameters**: [`ParameterExpression`] and [`ParameterVector`]
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qrc_ir::{Circuit, ParameterVector};
//!
//! let mut circuit = Circuit::new("example");
//! let input = circuit.add_qreg("input", 2).unwrap();
//! let theta = ParameterVector::new("theta", 2);
//!
//! for (i, qubit) in input.iter().enumerate() {
//!     circuit.ry(&theta[i], qubit).unwrap();
//! }
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.parameters(), &["theta[0]".to_string(), "theta[1]".to_string()]);
//!
//! let bound = circuit.bind_parameters([("theta[0]", 0.3), ("theta[1]", 1.2)]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::{Circuit, MEASURE_REGISTER};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{ParameterExpression, ParameterVector};
pub use qubit::{Clbit, ClbitId, ClassicalRegister, QuantumRegister, Qubit, QubitId};
