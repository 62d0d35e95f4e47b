//! A single reservoir layer: feature encoding followed by one Trotter step.
//!
//! Gate order inside a layer is part of the circuit's meaning:
//!
//! 1. `encoding` barrier over the input register
//! 2. `Ry(theta_i)` on input qubit `i`
//! 3. `evolution` barrier over every qubit
//! 4. `Rz(2 dt nu)` on every input qubit, then every hidden qubit
//! 5. `RXX(2 J dt)` on every (input, hidden) pair, hidden index fastest

use qrc_ir::{Circuit, IrResult, ParameterExpression, QuantumRegister};
use tracing::trace;

use crate::hamiltonian::HamiltonianParams;

/// Label of the barrier opening the encoding stage.
pub const ENCODING_LABEL: &str = "encoding";
/// Label of the barrier opening the evolution stage.
pub const EVOLUTION_LABEL: &str = "evolution";

/// Append one reservoir layer to `circuit`.
///
/// `layer_params` holds this layer's encoding parameters, one per input
/// qubit and in register order.
///
/// # Panics
///
/// Panics if `layer_params.len()` differs from the input register size.
/// Callers slice the parameter vector themselves, so a mismatch is a bug in
/// the caller rather than bad user input.
pub fn build_layer(
    circuit: &mut Circuit,
    input_reg: &QuantumRegister,
    hidden_reg: &QuantumRegister,
    layer_params: &[ParameterExpression],
    hamiltonian: &HamiltonianParams,
) -> IrResult<()> {
    assert_eq!(
        layer_params.len(),
        input_reg.len(),
        "layer parameter slice has {} entries for {} input qubits",
        layer_params.len(),
        input_reg.len(),
    );

    encode(circuit, input_reg, layer_params)?;

    circuit.barrier_all(Some(EVOLUTION_LABEL))?;
    apply_local_field(circuit, input_reg, hidden_reg, hamiltonian.local_field_angle())?;
    apply_coupling(circuit, input_reg, hidden_reg, hamiltonian.coupling_angle())?;

    Ok(())
}

/// Angle-encode features as Y rotations on the input register.
fn encode(
    circuit: &mut Circuit,
    input_reg: &QuantumRegister,
    layer_params: &[ParameterExpression],
) -> IrResult<()> {
    circuit.barrier(input_reg.iter(), Some(ENCODING_LABEL))?;
    for (qubit, theta) in input_reg.iter().zip(layer_params) {
        trace!(%qubit, %theta, "encode");
        circuit.ry(theta, qubit)?;
    }
    Ok(())
}

/// Local-field term: `exp(-i dt nu Z_k)` on every qubit.
fn apply_local_field(
    circuit: &mut Circuit,
    input_reg: &QuantumRegister,
    hidden_reg: &QuantumRegister,
    angle: f64,
) -> IrResult<()> {
    for qubit in input_reg.iter().chain(hidden_reg.iter()) {
        circuit.rz(angle, qubit)?;
    }
    Ok(())
}

/// Coupling term: `exp(-i dt J X_i X_h)` on every input/hidden pair.
fn apply_coupling(
    circuit: &mut Circuit,
    input_reg: &QuantumRegister,
    hidden_reg: &QuantumRegister,
    angle: f64,
) -> IrResult<()> {
    for input_qubit in input_reg.iter() {
        for hidden_qubit in hidden_reg.iter() {
            circuit.rxx(angle, input_qubit, hidden_qubit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrc_ir::{Instruction, ParameterVector, QubitId, StandardGate};

    fn setup(num_input: u32, num_hidden: u32) -> (Circuit, QuantumRegister, QuantumRegister) {
        let mut circuit = Circuit::new("layer");
        let input = circuit.add_qreg("input", num_input).unwrap();
        let hidden = circuit.add_qreg("hidden", num_hidden).unwrap();
        (circuit, input, hidden)
    }

    #[test]
    fn test_layer_sequence() {
        let (mut circuit, input, hidden) = setup(2, 1);
        let theta = ParameterVector::new("theta", 2);
        let h = HamiltonianParams::new(0.1, 0.5, 0.2);

        build_layer(&mut circuit, &input, &hidden, theta.slice(0..2), &h).unwrap();

        let names: Vec<_> = circuit.instructions().map(Instruction::name).collect();
        assert_eq!(
            names,
            vec!["barrier", "ry", "ry", "barrier", "rz", "rz", "rz", "rxx", "rxx"]
        );

        let ops: Vec<_> = circuit.instructions().collect();
        assert_eq!(ops[0].label(), Some(ENCODING_LABEL));
        assert_eq!(ops[0].qubits, vec![QubitId(0), QubitId(1)]);
        assert_eq!(ops[3].label(), Some(EVOLUTION_LABEL));
        assert_eq!(ops[3].qubits, vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(ops[7].qubits, vec![QubitId(0), QubitId(2)]);
        assert_eq!(ops[8].qubits, vec![QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_coupling_order_hidden_fastest() {
        let (mut circuit, input, hidden) = setup(2, 3);
        let theta = ParameterVector::new("theta", 2);
        let h = HamiltonianParams::new(0.1, 0.5, 0.2);

        build_layer(&mut circuit, &input, &hidden, theta.slice(0..2), &h).unwrap();

        let pairs: Vec<_> = circuit
            .instructions()
            .filter(|inst| inst.name() == "rxx")
            .map(|inst| (inst.qubits[0], inst.qubits[1]))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (QubitId(0), QubitId(2)),
                (QubitId(0), QubitId(3)),
                (QubitId(0), QubitId(4)),
                (QubitId(1), QubitId(2)),
                (QubitId(1), QubitId(3)),
                (QubitId(1), QubitId(4)),
            ]
        );

        // The local field runs over input then hidden before any coupling.
        let rz: Vec<_> = circuit
            .instructions()
            .filter(|inst| inst.name() == "rz")
            .map(|inst| inst.qubits[0])
            .collect();
        assert_eq!(rz, (0..5).map(QubitId).collect::<Vec<_>>());
    }

    #[test]
    fn test_encoding_uses_matching_parameter() {
        let (mut circuit, input, hidden) = setup(3, 0);
        let theta = ParameterVector::new("theta", 6);
        let h = HamiltonianParams::new(0.1, 0.5, 0.2);

        build_layer(&mut circuit, &input, &hidden, theta.slice(3..6), &h).unwrap();

        let rys: Vec<_> = circuit
            .instructions()
            .filter(|inst| inst.name() == "ry")
            .collect();
        for (i, inst) in rys.iter().enumerate() {
            let gate = inst.as_gate().unwrap();
            assert_eq!(gate.kind, StandardGate::Ry(theta[3 + i].clone()));
            assert_eq!(inst.qubits, vec![input[i]]);
        }
    }

    #[test]
    fn test_trotter_angles() {
        let (mut circuit, input, hidden) = setup(1, 2);
        let theta = ParameterVector::new("theta", 1);
        let h = HamiltonianParams::new(0.25, 2.0, -0.5);

        build_layer(&mut circuit, &input, &hidden, theta.slice(0..1), &h).unwrap();

        for inst in circuit.instructions() {
            match inst.as_gate().map(|g| &g.kind) {
                Some(StandardGate::Rz(angle)) => assert_eq!(angle.as_f64(), Some(1.0)),
                Some(StandardGate::RXX(angle)) => assert_eq!(angle.as_f64(), Some(-0.25)),
                _ => {}
            }
        }
    }

    #[test]
    fn test_no_hidden_qubits() {
        let (mut circuit, input, hidden) = setup(2, 0);
        let theta = ParameterVector::new("theta", 2);
        let h = HamiltonianParams::new(0.1, 0.5, 0.2);

        build_layer(&mut circuit, &input, &hidden, theta.slice(0..2), &h).unwrap();

        assert_eq!(circuit.instructions().filter(|i| i.name() == "rxx").count(), 0);
        assert_eq!(circuit.instructions().filter(|i| i.name() == "rz").count(), 2);
    }

    #[test]
    #[should_panic(expected = "layer parameter slice has 1 entries for 2 input qubits")]
    fn test_param_slice_mismatch_panics() {
        let (mut circuit, input, hidden) = setup(2, 1);
        let theta = ParameterVector::new("theta", 2);
        let h = HamiltonianParams::new(0.1, 0.5, 0.2);

        let _ = build_layer(&mut circuit, &input, &hidden, theta.slice(0..1), &h);
    }
}
