//! End-to-end structure of assembled reservoir circuits.

use qrc_ir::{Circuit, Instruction, InstructionKind, MEASURE_REGISTER, QubitId, StandardGate};
use qrc_reservoir::{
    CircuitAssembler, ENCODING_LABEL, EVOLUTION_LABEL, HamiltonianParams, RESET_LABEL,
    ReservoirError, build_circuit,
};

fn h() -> HamiltonianParams {
    HamiltonianParams::new(0.1, 0.5, 0.2)
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("angle should be bound");
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

fn barrier(inst: &Instruction, label: &str, qubits: &[u32]) {
    assert!(inst.is_barrier(), "expected barrier, got {}", inst.name());
    assert_eq!(inst.label(), Some(label));
    let expected: Vec<_> = qubits.iter().copied().map(QubitId).collect();
    assert_eq!(inst.qubits, expected);
}

fn gate(inst: &Instruction) -> &StandardGate {
    &inst.as_gate().expect("expected a gate").kind
}

#[test]
fn two_layer_single_pair_sequence() {
    let circuit = build_circuit(2, 1, 1, h()).unwrap();
    let ops: Vec<_> = circuit.instructions().collect();

    let names: Vec<_> = ops.iter().map(|i| i.name()).collect();
    assert_eq!(
        names,
        vec![
            "barrier", "ry", "barrier", "rz", "rz", "rxx", // layer 0
            "barrier", "reset", // reset input
            "barrier", "ry", "barrier", "rz", "rz", "rxx", // layer 1
            "measure",
        ]
    );

    for (offset, theta) in [(0, "theta[0]"), (8, "theta[1]")] {
        barrier(ops[offset], ENCODING_LABEL, &[0]);
        assert_eq!(gate(ops[offset + 1]).angle().symbol_name(), Some(theta));
        assert_eq!(ops[offset + 1].qubits, vec![QubitId(0)]);
        barrier(ops[offset + 2], EVOLUTION_LABEL, &[0, 1]);
        assert_close(gate(ops[offset + 3]).angle().as_f64(), 0.1);
        assert_eq!(ops[offset + 3].qubits, vec![QubitId(0)]);
        assert_close(gate(ops[offset + 4]).angle().as_f64(), 0.1);
        assert_eq!(ops[offset + 4].qubits, vec![QubitId(1)]);
        assert_close(gate(ops[offset + 5]).angle().as_f64(), 0.04);
        assert_eq!(ops[offset + 5].qubits, vec![QubitId(0), QubitId(1)]);
    }

    barrier(ops[6], RESET_LABEL, &[0]);
    assert!(ops[7].is_reset());
    assert_eq!(ops[7].qubits, vec![QubitId(0)]);

    let measure = ops[14];
    assert!(matches!(measure.kind, InstructionKind::Measure));
    assert_eq!(measure.qubits, vec![QubitId(0), QubitId(1)]);
    assert_eq!(circuit.num_clbits(), 2);
    assert_eq!(circuit.cregs()[0].name(), MEASURE_REGISTER);
}

#[test]
fn build_is_deterministic() {
    let a = build_circuit(3, 2, 2, h()).unwrap();
    let b = build_circuit(3, 2, 2, h()).unwrap();

    assert_eq!(a.name(), b.name());
    assert_eq!(a.qregs(), b.qregs());
    assert_eq!(a.parameters(), b.parameters());
    assert!(a.instructions().eq(b.instructions()));
}

#[test]
fn hidden_register_is_never_reset() {
    let circuit = build_circuit(4, 2, 3, h()).unwrap();
    let hidden = circuit.qreg("hidden").unwrap();
    for inst in circuit.instructions().filter(|i| i.is_reset()) {
        assert!(!hidden.qubits().contains(&inst.qubits[0]));
    }
    assert_eq!(circuit.instructions().filter(|i| i.is_reset()).count(), 3 * 2);
}

#[test]
fn zero_hidden_qubits() {
    let circuit = build_circuit(2, 2, 0, h()).unwrap();
    assert_eq!(circuit.num_qubits(), 2);
    assert!(circuit.qreg("hidden").unwrap().is_empty());
    assert_eq!(circuit.instructions().filter(|i| i.name() == "rxx").count(), 0);
    assert_eq!(circuit.instructions().filter(|i| i.name() == "rz").count(), 4);
}

#[test]
fn zero_coefficients_still_emit_gates() {
    let circuit = build_circuit(1, 1, 1, HamiltonianParams::new(0.0, 0.5, 0.2)).unwrap();
    let angles: Vec<_> = circuit
        .instructions()
        .filter(|i| matches!(i.name(), "rz" | "rxx"))
        .map(|i| gate(i).angle().as_f64())
        .collect();
    assert_eq!(angles, vec![Some(0.0), Some(0.0), Some(0.0)]);
}

#[test]
fn invalid_arguments() {
    assert!(matches!(
        build_circuit(0, 1, 1, h()),
        Err(ReservoirError::InvalidLayerCount(0))
    ));
    assert!(matches!(
        build_circuit(1, 0, 1, h()),
        Err(ReservoirError::InvalidInputCount(0))
    ));
}

#[test]
fn bind_then_emit_constant_angles() {
    let assembler = CircuitAssembler::new(2, 2, 1, h()).unwrap();
    let circuit: Circuit = assembler.build().unwrap();
    let bound = assembler
        .bind_features(&circuit, &[vec![0.1, 0.2], vec![0.3, 0.4]])
        .unwrap();

    assert!(!bound.is_parameterized());
    assert_eq!(bound.num_ops(), circuit.num_ops());
    // The unbound circuit keeps its symbols.
    assert_eq!(circuit.num_parameters(), 4);
}

#[test]
fn circuit_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Circuit>();
}
