//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::dag::{CircuitDag, NodeIndex};
use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, ClassicalRegister, QuantumRegister, Qubit, QubitId};

/// Name of the classical register created by [`Circuit::measure_all`].
pub const MEASURE_REGISTER: &str = "meas";

/// A quantum circuit.
///
/// Qubits are grouped into named registers and addressed by [`QubitId`].
/// Symbolic gate angles are tracked in a parameter table so they can be
/// listed in first-use order and bound by name before execution.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// Quantum registers, in creation order.
    qregs: Vec<QuantumRegister>,
    /// Classical registers, in creation order.
    cregs: Vec<ClassicalRegister>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Unbound parameter names in first-use order.
    parameters: Vec<String>,
    /// Parameter name to the operations that reference it.
    parameter_slots: FxHashMap<String, Vec<NodeIndex>>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            dag: CircuitDag::new(),
            parameters: vec![],
            parameter_slots: FxHashMap::default(),
        }
    }

    /// Add a quantum register with `size` qubits.
    ///
    /// Qubit ids continue from the qubits already in the circuit, so
    /// registers added in sequence occupy consecutive id ranges.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<QuantumRegister> {
        let name = name.into();
        if self.qregs.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = QubitId(self.qubits.len() as u32);
            self.qubits.push(Qubit::with_register(id, &name, i));
            self.dag.add_qubit(id);
            ids.push(id);
        }
        let register = QuantumRegister::new(name, ids);
        self.qregs.push(register.clone());
        Ok(register)
    }

    /// Add a classical register with `size` bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_creg(
        &mut self,
        name: impl Into<String>,
        size: u32,
    ) -> IrResult<ClassicalRegister> {
        let name = name.into();
        if self.cregs.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = ClbitId(self.clbits.len() as u32);
            self.clbits.push(Clbit::with_register(id, &name, i));
            self.dag.add_clbit(id);
            ids.push(id);
        }
        let register = ClassicalRegister::new(name, ids);
        self.cregs.push(register.clone());
        Ok(register)
    }

    fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let symbol = instruction
            .as_gate()
            .and_then(|g| g.kind.angle().symbol_name())
            .map(str::to_string);
        let node = self.dag.apply(instruction)?;
        if let Some(name) = symbol {
            let slots = self.parameter_slots.entry(name.clone()).or_default();
            if slots.is_empty() {
                self.parameters.push(name);
            }
            slots.push(node);
        }
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::Ry(theta.into()),
            qubit,
        ))
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::Rz(theta.into()),
            qubit,
        ))
    }

    /// Apply RXX (XX rotation) gate.
    pub fn rxx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::RXX(theta.into()),
            q1,
            q2,
        ))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        label: Option<&str>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits, label.map(str::to_string)))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self, label: Option<&str>) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.barrier(qubits, label)
    }

    /// Measure every qubit into a fresh classical register.
    ///
    /// Adds a register named [`MEASURE_REGISTER`] with one bit per qubit and
    /// appends a single measurement covering all qubits, qubit `i` into bit `i`
    /// of that register. No barrier is inserted before the measurement.
    #[allow(clippy::cast_possible_truncation)]
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let creg = self.add_creg(MEASURE_REGISTER, self.qubits.len() as u32)?;
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.append(Instruction::measure_all(
            qubits,
            creg.clbits().iter().copied(),
        )?)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Unbound parameter names in first-use order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of unbound parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Whether any gate angle is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Operations referencing the named parameter, in program order.
    pub fn parameter_uses(&self, name: &str) -> impl Iterator<Item = &Instruction> {
        self.parameter_slots
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|&node| self.dag.get_instruction(node))
    }

    /// Return a copy of this circuit with the given parameters bound.
    ///
    /// Every name must be a parameter of this circuit and may appear at most
    /// once; names not mentioned stay symbolic.
    pub fn bind_parameters<I, S>(&self, values: I) -> IrResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut bound = self.clone();
        let mut seen = FxHashSet::default();
        for (name, value) in values {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(IrError::DuplicateBinding(name.to_string()));
            }
            if !value.is_finite() {
                return Err(IrError::NonFiniteBinding {
                    name: name.to_string(),
                    value,
                });
            }
            let slots = bound
                .parameter_slots
                .remove(name)
                .ok_or_else(|| IrError::UnknownParameter(name.to_string()))?;
            for node in slots {
                if let Some(gate) = bound
                    .dag
                    .get_instruction_mut(node)
                    .and_then(Instruction::gate_mut)
                {
                    let angle = gate.kind.angle().bind(name, value);
                    *gate.kind.angle_mut() = angle;
                }
            }
            bound.parameters.retain(|p| p != name);
        }
        Ok(bound)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Iterate over operations in program order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.ops().map(|(_, inst)| inst)
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Quantum registers in creation order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in creation order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name() == name)
    }
}
