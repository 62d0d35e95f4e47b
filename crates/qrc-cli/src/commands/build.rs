//! Build command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use serde::Serialize;
use tracing::debug;

use qrc_ir::{Circuit, ClassicalRegister, Instruction, QuantumRegister};
use qrc_qasm3::emit;
use qrc_reservoir::{CircuitAssembler, ConfigOverrides, ReservoirConfig};

/// Output format of the built circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// OpenQASM 3.0 source
    #[default]
    Qasm3,
    /// JSON document with registers, parameters and instructions
    Json,
}

/// Arguments of `qrc build`.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Reservoir config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of layers
    #[arg(short, long)]
    pub layers: Option<u32>,

    /// Number of input qubits
    #[arg(short, long)]
    pub input: Option<u32>,

    /// Number of hidden qubits
    #[arg(long)]
    pub hidden: Option<u32>,

    /// Trotter time step
    #[arg(long, allow_hyphen_values = true)]
    pub dt: Option<f64>,

    /// Local field strength
    #[arg(long, allow_hyphen_values = true)]
    pub nu: Option<f64>,

    /// Input-hidden coupling strength (J)
    #[arg(long, short = 'J', allow_hyphen_values = true)]
    pub coupling: Option<f64>,

    /// Circuit name
    #[arg(long)]
    pub name: Option<String>,

    /// Feature matrix to bind, one row per layer (JSON or YAML)
    #[arg(long)]
    pub features: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Qasm3)]
    pub format: OutputFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            name: self.name.clone(),
            parameter_prefix: None,
            num_layers: self.layers,
            num_input: self.input,
            num_hidden: self.hidden,
            dt: self.dt,
            nu: self.nu,
            j: self.coupling,
        }
    }
}

/// Execute the build command.
pub fn execute(args: &BuildArgs) -> Result<()> {
    let config = resolve_config(args)?;
    eprintln!(
        "{} Building reservoir '{}': {} layers, {} input, {} hidden",
        style("→").cyan().bold(),
        style(&config.name).green(),
        config.num_layers,
        config.num_input,
        config.num_hidden
    );

    let assembler = CircuitAssembler::from_config(&config)?;
    let mut circuit = assembler.build()?;

    if let Some(path) = &args.features {
        let features = load_features(path)?;
        circuit = assembler
            .bind_features(&circuit, &features)
            .with_context(|| format!("Failed to bind features from {}", path.display()))?;
        eprintln!(
            "  Bound {} feature rows from {}",
            features.len(),
            style(path.display()).green()
        );
    }

    let content = render(&circuit, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            eprintln!("  Output: {}", style(path.display()).green());
        }
        None => print!("{content}"),
    }

    eprintln!(
        "{} {} qubits, {} parameters, {} ops, depth {}",
        style("✓").green().bold(),
        circuit.num_qubits(),
        circuit.num_parameters(),
        circuit.num_ops(),
        circuit.depth()
    );

    Ok(())
}

/// Combine flags, environment and config file, in that order of precedence.
fn resolve_config(args: &BuildArgs) -> Result<ReservoirConfig> {
    let base = args
        .config
        .as_deref()
        .map(ReservoirConfig::from_file)
        .transpose()?;
    let env = ConfigOverrides::from_env()?;
    debug!(?env, "environment overrides");

    Ok(args.overrides().or(env).resolve(base)?)
}

/// Load a feature matrix from a JSON or YAML file.
fn load_features(path: &Path) -> Result<Vec<Vec<f64>>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON feature matrix: {}", path.display())),
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML feature matrix: {}", path.display())),
    }
}

/// Serializable view of a circuit.
#[derive(Serialize)]
struct CircuitDocument<'a> {
    name: &'a str,
    num_qubits: usize,
    num_clbits: usize,
    qregs: &'a [QuantumRegister],
    cregs: &'a [ClassicalRegister],
    parameters: &'a [String],
    instructions: Vec<&'a Instruction>,
}

impl<'a> From<&'a Circuit> for CircuitDocument<'a> {
    fn from(circuit: &'a Circuit) -> Self {
        Self {
            name: circuit.name(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            qregs: circuit.qregs(),
            cregs: circuit.cregs(),
            parameters: circuit.parameters(),
            instructions: circuit.instructions().collect(),
        }
    }
}

/// Render a circuit in the requested format.
fn render(circuit: &Circuit, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Qasm3 => emit(circuit).context("Failed to emit OpenQASM 3"),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&CircuitDocument::from(circuit))
                .context("Failed to serialize circuit")?;
            json.push('\n');
            Ok(json)
        }
    }
}
