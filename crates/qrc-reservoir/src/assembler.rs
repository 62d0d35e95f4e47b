//! Full reservoir circuit assembly.

use std::fmt;

use qrc_ir::{Circuit, ParameterVector, QuantumRegister};
use tracing::{debug, info, instrument};

use crate::config::ReservoirConfig;
use crate::error::{ReservoirError, ReservoirResult};
use crate::hamiltonian::HamiltonianParams;
use crate::layer::build_layer;

/// Name of the register carrying the per-layer feature encoding.
pub const INPUT_REGISTER: &str = "input";
/// Name of the register carrying memory across layers.
pub const HIDDEN_REGISTER: &str = "hidden";
/// Label of the barrier preceding the inter-layer input reset.
pub const RESET_LABEL: &str = "reset input";
/// Default circuit name.
pub const DEFAULT_CIRCUIT_NAME: &str = "reservoir";
/// Default prefix of the encoding parameter vector.
pub const DEFAULT_PARAMETER_PREFIX: &str = "theta";

/// Largest total qubit count (input plus hidden) an assembler accepts.
pub const MAX_QUBITS: u32 = 1 << 16;
/// Largest encoding parameter count (layers times input) an assembler accepts.
pub const MAX_PARAMETERS: u64 = 1 << 24;
/// Largest number of operations a built circuit may contain.
pub const MAX_OPERATIONS: u64 = 1 << 26;

/// Operations emitted for the given shape: two barriers, the Ry, Rz and RXX
/// gates of each layer, a barrier plus resets between layers, one measure.
fn operation_count(num_layers: u32, num_input: u32, num_hidden: u32) -> u128 {
    let (layers, input, hidden) = (
        u128::from(num_layers),
        u128::from(num_input),
        u128::from(num_hidden),
    );
    let per_layer = 2 + input + (input + hidden) + input * hidden;
    let between = layers.saturating_sub(1) * (1 + input);
    layers * per_layer + between + 1
}

/// Assembly stage, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Allocating,
    BuildingLayer(u32),
    Resetting(u32),
    Measuring,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Allocating => write!(f, "allocating"),
            Stage::BuildingLayer(k) => write!(f, "building-layer({k})"),
            Stage::Resetting(k) => write!(f, "resetting({k})"),
            Stage::Measuring => write!(f, "measuring"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Builds complete reservoir circuits.
///
/// The assembler is validated on construction, so [`CircuitAssembler::build`]
/// only fails if the circuit IR itself rejects an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitAssembler {
    num_layers: u32,
    num_input: u32,
    num_hidden: u32,
    hamiltonian: HamiltonianParams,
    name: String,
    parameter_prefix: String,
}

impl CircuitAssembler {
    /// Create an assembler, rejecting invalid sizes and coefficients.
    pub fn new(
        num_layers: u32,
        num_input: u32,
        num_hidden: u32,
        hamiltonian: HamiltonianParams,
    ) -> ReservoirResult<Self> {
        if num_layers < 1 {
            return Err(ReservoirError::InvalidLayerCount(num_layers));
        }
        if num_input < 1 {
            return Err(ReservoirError::InvalidInputCount(num_input));
        }
        let num_qubits = u64::from(num_input) + u64::from(num_hidden);
        if num_qubits > u64::from(MAX_QUBITS) {
            return Err(ReservoirError::CircuitTooLarge(format!(
                "{num_input} input + {num_hidden} hidden qubits exceeds {MAX_QUBITS}"
            )));
        }
        let num_parameters = u64::from(num_layers) * u64::from(num_input);
        if num_parameters > MAX_PARAMETERS {
            return Err(ReservoirError::CircuitTooLarge(format!(
                "{num_layers} layers x {num_input} input parameters exceeds {MAX_PARAMETERS}"
            )));
        }
        let num_ops = operation_count(num_layers, num_input, num_hidden);
        if num_ops > u128::from(MAX_OPERATIONS) {
            return Err(ReservoirError::CircuitTooLarge(format!(
                "{num_ops} operations exceeds {MAX_OPERATIONS}"
            )));
        }
        hamiltonian.validate()?;

        Ok(Self {
            num_layers,
            num_input,
            num_hidden,
            hamiltonian,
            name: DEFAULT_CIRCUIT_NAME.into(),
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.into(),
        })
    }

    /// Create an assembler from a loaded configuration.
    pub fn from_config(config: &ReservoirConfig) -> ReservoirResult<Self> {
        Ok(Self::new(
            config.num_layers,
            config.num_input,
            config.num_hidden,
            config.hamiltonian,
        )?
        .with_name(&config.name)
        .with_parameter_prefix(&config.parameter_prefix))
    }

    /// Override the circuit name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the encoding parameter prefix.
    #[must_use]
    pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_prefix = prefix.into();
        self
    }

    /// Number of layers.
    pub fn num_layers(&self) -> u32 {
        self.num_layers
    }

    /// Number of input qubits.
    pub fn num_input(&self) -> u32 {
        self.num_input
    }

    /// Number of hidden qubits.
    pub fn num_hidden(&self) -> u32 {
        self.num_hidden
    }

    /// Hamiltonian coefficients shared by all layers.
    pub fn hamiltonian(&self) -> &HamiltonianParams {
        &self.hamiltonian
    }

    /// Number of encoding parameters, `num_layers * num_input`.
    pub fn num_parameters(&self) -> usize {
        self.num_layers as usize * self.num_input as usize
    }

    /// Name of the encoding parameter at flat `index`.
    pub fn parameter_name(&self, index: usize) -> String {
        format!("{}[{index}]", self.parameter_prefix)
    }

    /// Assemble the full circuit.
    #[instrument(
        skip(self),
        fields(layers = self.num_layers, input = self.num_input, hidden = self.num_hidden)
    )]
    pub fn build(&self) -> ReservoirResult<Circuit> {
        let mut stage = Stage::Allocating;
        debug!(%stage, "reservoir assembly");

        let mut circuit = Circuit::new(&self.name);
        let input_reg = circuit.add_qreg(INPUT_REGISTER, self.num_input)?;
        let hidden_reg = circuit.add_qreg(HIDDEN_REGISTER, self.num_hidden)?;
        let encoding = ParameterVector::new(&self.parameter_prefix, self.num_parameters());

        let width = self.num_input as usize;
        for layer in 0..self.num_layers {
            stage = Stage::BuildingLayer(layer);
            debug!(%stage, "reservoir assembly");

            let start = layer as usize * width;
            let layer_params = encoding.slice(start..start + width);
            build_layer(
                &mut circuit,
                &input_reg,
                &hidden_reg,
                layer_params,
                &self.hamiltonian,
            )?;

            if layer + 1 < self.num_layers {
                stage = Stage::Resetting(layer);
                debug!(%stage, "reservoir assembly");
                reset_input(&mut circuit, &input_reg)?;
            }
        }

        stage = Stage::Measuring;
        debug!(%stage, "reservoir assembly");
        circuit.measure_all()?;

        stage = Stage::Done;
        debug!(%stage, "reservoir assembly");
        info!(
            "Assembled reservoir circuit '{}': {} qubits, {} parameters, {} ops",
            circuit.name(),
            circuit.num_qubits(),
            circuit.num_parameters(),
            circuit.num_ops()
        );

        Ok(circuit)
    }

    /// Bind one feature row per layer to the encoding parameters.
    ///
    /// Row `L` must hold `num_input` values; value `i` of row `L` is bound to
    /// the parameter at flat index `L * num_input + i`.
    pub fn bind_features<R: AsRef<[f64]>>(
        &self,
        circuit: &Circuit,
        features: &[R],
    ) -> ReservoirResult<Circuit> {
        let bindings = self.feature_bindings(features)?;
        Ok(circuit.bind_parameters(bindings)?)
    }

    /// Map a feature matrix to `(parameter name, value)` pairs.
    pub fn feature_bindings<R: AsRef<[f64]>>(
        &self,
        features: &[R],
    ) -> ReservoirResult<Vec<(String, f64)>> {
        if features.len() != self.num_layers as usize {
            return Err(ReservoirError::FeatureShape(format!(
                "expected {} feature rows (one per layer), got {}",
                self.num_layers,
                features.len()
            )));
        }

        let width = self.num_input as usize;
        let mut bindings = Vec::with_capacity(self.num_parameters());
        for (layer, row) in features.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ReservoirError::FeatureShape(format!(
                    "row {layer} has {} values, expected {width}",
                    row.len()
                )));
            }
            for (i, &value) in row.iter().enumerate() {
                bindings.push((self.parameter_name(layer * width + i), value));
            }
        }
        Ok(bindings)
    }
}

/// Reset the input register ahead of the next layer's encoding.
///
/// Hidden qubits are left untouched; they carry the reservoir's memory.
fn reset_input(circuit: &mut Circuit, input_reg: &QuantumRegister) -> ReservoirResult<()> {
    circuit.barrier(input_reg.iter(), Some(RESET_LABEL))?;
    for qubit in input_reg.iter() {
        circuit.reset(qubit)?;
    }
    Ok(())
}

/// Build a reservoir circuit with the default name and parameter prefix.
pub fn build_circuit(
    num_layers: u32,
    num_input: u32,
    num_hidden: u32,
    hamiltonian: HamiltonianParams,
) -> ReservoirResult<Circuit> {
    CircuitAssembler::new(num_layers, num_input, num_hidden, hamiltonian)?.build()
}
