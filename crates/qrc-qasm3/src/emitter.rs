//! QASM3 emitter for serializing reservoir circuits.

use qrc_ir::{
    Circuit, ClbitId, Instruction, InstructionKind, ParameterExpression, QubitId, StandardGate,
};
use rustc_hash::FxHashMap;

use crate::error::{EmitError, EmitResult};

/// Definition of `rxx`, which `stdgates.inc` does not provide.
const RXX_DEFINITION: &str =
    "gate rxx(theta) a, b { h a; h b; cx a, b; rz(theta) b; cx a, b; h a; h b; }";

/// Words that cannot be used as identifiers in OpenQASM 3.
const RESERVED: &[&str] = &[
    "OPENQASM", "include", "input", "output", "def", "defcal", "cal", "gate", "extern", "box",
    "let", "break", "continue", "if", "else", "end", "return", "for", "while", "in", "switch",
    "case", "default", "pragma", "const", "readonly", "mutable", "qubit", "qreg", "creg",
    "bool", "bit", "int", "uint", "float", "angle", "complex", "array", "void", "duration",
    "stretch", "gphase", "inv", "pow", "ctrl", "negctrl", "durationof", "delay", "reset",
    "measure", "barrier", "true", "false", "pi", "tau", "euler", "im",
];

/// Emit a circuit as OpenQASM 3.0 source code.
///
/// Every unbound parameter becomes an `input float[64]` declaration and
/// every non-empty register is declared under its own name. Names that are
/// not valid QASM identifiers are rewritten: `theta[3]` becomes `theta_3`
/// and reserved words such as `input` gain a trailing underscore.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    let mut emitter = Emitter::new(circuit)?;
    emitter.emit_circuit()
}

/// Map a name to a valid QASM identifier.
///
/// Runs of characters outside `[A-Za-z0-9_]` collapse to a single `_`
/// separator; a leading digit gets a `_` prefix and reserved words a `_`
/// suffix.
pub fn sanitize_identifier(name: &str) -> EmitResult<String> {
    let mut ident = name
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if ident.is_empty() {
        return Err(EmitError::InvalidIdentifier(name.to_string()));
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    Ok(ident)
}

/// Identifiers already handed out, with the name each one came from.
#[derive(Default)]
struct Identifiers {
    claimed: FxHashMap<String, String>,
}

impl Identifiers {
    fn claim(&mut self, name: &str) -> EmitResult<String> {
        let ident = sanitize_identifier(name)?;
        if let Some(first) = self.claimed.get(&ident) {
            return Err(EmitError::IdentifierCollision {
                first: first.clone(),
                second: name.to_string(),
                ident,
            });
        }
        self.claimed.insert(ident.clone(), name.to_string());
        Ok(ident)
    }
}

/// QASM3 emitter.
struct Emitter<'a> {
    circuit: &'a Circuit,
    output: String,
    params: FxHashMap<&'a str, String>,
    qubits: FxHashMap<QubitId, String>,
    clbits: FxHashMap<ClbitId, String>,
}

impl<'a> Emitter<'a> {
    fn new(circuit: &'a Circuit) -> EmitResult<Self> {
        let mut idents = Identifiers::default();

        let mut params = FxHashMap::default();
        for name in circuit.parameters() {
            params.insert(name.as_str(), idents.claim(name)?);
        }

        let mut qubits = FxHashMap::default();
        for reg in circuit.qregs() {
            let ident = idents.claim(reg.name())?;
            for (i, &q) in reg.qubits().iter().enumerate() {
                qubits.insert(q, format!("{ident}[{i}]"));
            }
        }

        let mut clbits = FxHashMap::default();
        for reg in circuit.cregs() {
            let ident = idents.claim(reg.name())?;
            for (i, &c) in reg.clbits().iter().enumerate() {
                clbits.insert(c, format!("{ident}[{i}]"));
            }
        }

        Ok(Self {
            circuit,
            output: String::new(),
            params,
            qubits,
            clbits,
        })
    }

    fn emit_circuit(&mut self) -> EmitResult<String> {
        let circuit = self.circuit;

        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        let uses_rxx = circuit
            .instructions()
            .any(|inst| matches!(inst.as_gate().map(|g| &g.kind), Some(StandardGate::RXX(_))));
        if uses_rxx {
            self.writeln(RXX_DEFINITION);
            self.writeln("");
        }

        // Parameter declarations, in first-use order
        if !circuit.parameters().is_empty() {
            for name in circuit.parameters() {
                let line = format!("input float[64] {};", self.param_ident(name)?);
                self.writeln(&line);
            }
            self.writeln("");
        }

        // Register declarations
        let mut declared = false;
        for reg in circuit.qregs().iter().filter(|r| !r.is_empty()) {
            let ident = sanitize_identifier(reg.name())?;
            self.writeln(&format!("qubit[{}] {ident};", reg.len()));
            declared = true;
        }
        for reg in circuit.cregs().iter().filter(|r| !r.is_empty()) {
            let ident = sanitize_identifier(reg.name())?;
            self.writeln(&format!("bit[{}] {ident};", reg.len()));
            declared = true;
        }
        if declared {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let param = self.emit_param(gate.kind.angle())?;
                let qubits = self.emit_qubits(&instruction.qubits)?;
                self.writeln(&format!("{}({param}) {qubits};", gate.name()));
            }

            InstructionKind::Measure => {
                for (&q, &c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let line = format!("{} = measure {};", self.clbit(c)?, self.qubit(q)?);
                    self.writeln(&line);
                }
            }

            InstructionKind::Reset => {
                for &q in &instruction.qubits {
                    let line = format!("reset {};", self.qubit(q)?);
                    self.writeln(&line);
                }
            }

            InstructionKind::Barrier { label } => {
                if let Some(label) = label {
                    self.writeln(&format!("// {label}"));
                }
                let qubits = self.emit_qubits(&instruction.qubits)?;
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }

        Ok(())
    }

    fn emit_param(&self, param: &ParameterExpression) -> EmitResult<String> {
        match param {
            ParameterExpression::Constant(v) => Ok(format_angle(*v)),
            ParameterExpression::Symbol(name) => self.param_ident(name).map(str::to_string),
        }
    }

    fn param_ident(&self, name: &str) -> EmitResult<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| EmitError::InvalidIdentifier(name.to_string()))
    }

    fn qubit(&self, qubit: QubitId) -> EmitResult<&str> {
        self.qubits
            .get(&qubit)
            .map(String::as_str)
            .ok_or(EmitError::UnmappedQubit(qubit))
    }

    fn clbit(&self, clbit: ClbitId) -> EmitResult<&str> {
        self.clbits
            .get(&clbit)
            .map(String::as_str)
            .ok_or(EmitError::UnmappedClbit(clbit))
    }

    fn emit_qubits(&self, qubits: &[QubitId]) -> EmitResult<String> {
        let names = qubits
            .iter()
            .map(|&q| self.qubit(q))
            .collect::<EmitResult<Vec<_>>>()?;
        Ok(names.join(", "))
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Format a constant angle, spelling common fractions of pi symbolically.
fn format_angle(v: f64) -> String {
    use std::f64::consts::PI;

    const FRACTIONS: &[(f64, &str)] = &[
        (PI, "pi"),
        (-PI, "-pi"),
        (PI / 2.0, "pi/2"),
        (-PI / 2.0, "-pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI / 4.0, "-pi/4"),
    ];
    FRACTIONS
        .iter()
        .find(|(value, _)| (v - value).abs() < 1e-10)
        .map_or_else(|| format!("{v}"), |(_, text)| (*text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("theta[3]").unwrap(), "theta_3");
        assert_eq!(sanitize_identifier("hidden").unwrap(), "hidden");
        assert_eq!(sanitize_identifier("input").unwrap(), "input_");
        assert_eq!(sanitize_identifier("2x").unwrap(), "_2x");
        assert_eq!(sanitize_identifier("a b-c").unwrap(), "a_b_c");
        assert!(matches!(
            sanitize_identifier("[]"),
            Err(EmitError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_identifier_collision() {
        let mut idents = Identifiers::default();
        idents.claim("x[0]").unwrap();
        let err = idents.claim("x_0").unwrap_err();
        assert!(matches!(
            err,
            EmitError::IdentifierCollision { ref ident, .. } if ident == "x_0"
        ));
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(std::f64::consts::PI / 2.0), "pi/2");
        assert_eq!(format_angle(-std::f64::consts::PI), "-pi");
        assert_eq!(format_angle(0.1), "0.1");
        assert_eq!(format_angle(1.0), "1");
        assert_eq!(format_angle(-0.25), "-0.25");
    }

    #[test]
    fn test_emit_gates_and_barrier_label() {
        let mut circuit = Circuit::new("test");
        let a = circuit.add_qreg("a", 2).unwrap();
        circuit
            .barrier(a.iter(), Some("evolution"))
            .unwrap()
            .rz(0.5_f64, a[0])
            .unwrap()
            .rxx(std::f64::consts::PI / 4.0, a[0], a[1])
            .unwrap()
            .reset(a[1])
            .unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
        assert!(qasm.contains(RXX_DEFINITION));
        assert!(qasm.contains("qubit[2] a;"));
        assert!(qasm.contains("// evolution\nbarrier a[0], a[1];\n"));
        assert!(qasm.contains("rz(0.5) a[0];"));
        assert!(qasm.contains("rxx(pi/4) a[0], a[1];"));
        assert!(qasm.contains("reset a[1];"));
        assert!(!qasm.contains("input float"));
    }

    #[test]
    fn test_no_rxx_definition_without_rxx() {
        let mut circuit = Circuit::new("test");
        let a = circuit.add_qreg("a", 1).unwrap();
        circuit.ry(ParameterExpression::symbol("t"), a[0]).unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(!qasm.contains("gate rxx"));
        assert!(qasm.contains("input float[64] t;"));
        assert!(qasm.contains("ry(t) a[0];"));
    }

    #[test]
    fn test_register_parameter_collision() {
        let mut circuit = Circuit::new("test");
        let a = circuit.add_qreg("t", 1).unwrap();
        circuit.ry(ParameterExpression::symbol("t"), a[0]).unwrap();

        assert!(matches!(
            emit(&circuit),
            Err(EmitError::IdentifierCollision { .. })
        ));
    }
}
