//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
///
/// Rotation angles follow the usual convention `R(θ) = exp(-i θ/2 G)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// XX rotation gate.
    RXX(ParameterExpression),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::RXX(_) => "rxx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::Ry(_) | StandardGate::Rz(_) => 1,
            StandardGate::RXX(_) => 2,
        }
    }

    /// Check if this gate has an unbound parameter.
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_symbolic()
    }

    /// The rotation angle.
    pub fn angle(&self) -> &ParameterExpression {
        match self {
            StandardGate::Ry(p) | StandardGate::Rz(p) | StandardGate::RXX(p) => p,
        }
    }

    /// Mutable access to the rotation angle.
    pub fn angle_mut(&mut self) -> &mut ParameterExpression {
        match self {
            StandardGate::Ry(p) | StandardGate::Rz(p) | StandardGate::RXX(p) => p,
        }
    }
}

/// A gate applied by an instruction.
///
/// Gates carry no label; only barriers are labeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: StandardGate,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self { kind: gate }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}
