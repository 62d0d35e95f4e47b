//! Reservoir configuration.
//!
//! A configuration is assembled from up to three layers, highest
//! precedence first:
//! 1. Explicit overrides (command line flags)
//! 2. Environment variables (`QRC_` prefix)
//! 3. A YAML or JSON configuration file
//!
//! `name`, `parameter_prefix` and `num_hidden` have defaults; the layer
//! count, input count and all three Hamiltonian coefficients must come
//! from one of the layers.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assembler::{DEFAULT_CIRCUIT_NAME, DEFAULT_PARAMETER_PREFIX};
use crate::error::{ReservoirError, ReservoirResult};
use crate::hamiltonian::HamiltonianParams;

/// Environment variable overriding the layer count.
pub const ENV_NUM_LAYERS: &str = "QRC_NUM_LAYERS";
/// Environment variable overriding the input qubit count.
pub const ENV_NUM_INPUT: &str = "QRC_NUM_INPUT";
/// Environment variable overriding the hidden qubit count.
pub const ENV_NUM_HIDDEN: &str = "QRC_NUM_HIDDEN";
/// Environment variable overriding the time step.
pub const ENV_DT: &str = "QRC_DT";
/// Environment variable overriding the local field strength.
pub const ENV_NU: &str = "QRC_NU";
/// Environment variable overriding the coupling strength.
pub const ENV_J: &str = "QRC_J";

/// Complete reservoir configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirConfig {
    /// Circuit name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Prefix of the encoding parameter vector.
    #[serde(default = "default_parameter_prefix")]
    pub parameter_prefix: String,

    /// Number of encode/evolve layers.
    pub num_layers: u32,

    /// Number of input qubits.
    pub num_input: u32,

    /// Number of hidden qubits.
    #[serde(default)]
    pub num_hidden: u32,

    /// Evolution coefficients.
    pub hamiltonian: HamiltonianParams,
}

fn default_name() -> String {
    DEFAULT_CIRCUIT_NAME.to_string()
}

fn default_parameter_prefix() -> String {
    DEFAULT_PARAMETER_PREFIX.to_string()
}

impl ReservoirConfig {
    /// Load a configuration file, picking the format from its extension.
    ///
    /// `.json` files are parsed as JSON; everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ReservoirResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReservoirError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };

        info!("Loaded reservoir config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(contents: &str) -> ReservoirResult<Self> {
        let config: Self = serde_yaml_ng::from_str(contents)
            .map_err(|e| ReservoirError::Config(format!("invalid YAML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(contents: &str) -> ReservoirResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| ReservoirError::Config(format!("invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ReservoirResult<()> {
        if self.num_layers == 0 {
            return Err(ReservoirError::InvalidLayerCount(self.num_layers));
        }
        if self.num_input == 0 {
            return Err(ReservoirError::InvalidInputCount(self.num_input));
        }
        if self.name.trim().is_empty() {
            return Err(ReservoirError::Config("name must not be empty".to_string()));
        }
        if !is_identifier(&self.parameter_prefix) {
            return Err(ReservoirError::Config(format!(
                "parameter_prefix must be an identifier, got '{}'",
                self.parameter_prefix
            )));
        }
        self.hamiltonian.validate()
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> ReservoirResult<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| ReservoirError::Config(format!("failed to serialize config: {e}")))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Partial configuration used to override a base configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub name: Option<String>,
    pub parameter_prefix: Option<String>,
    pub num_layers: Option<u32>,
    pub num_input: Option<u32>,
    pub num_hidden: Option<u32>,
    /// Overrides `hamiltonian.dt`.
    pub dt: Option<f64>,
    /// Overrides `hamiltonian.nu`.
    pub nu: Option<f64>,
    /// Overrides `hamiltonian.j`.
    pub j: Option<f64>,
}

impl ConfigOverrides {
    /// Read overrides from `QRC_*` environment variables.
    pub fn from_env() -> ReservoirResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary variable lookup.
    ///
    /// Variables that are absent leave the field unset. Variables that are
    /// present but unparseable are an error.
    pub fn from_lookup<F>(lookup: F) -> ReservoirResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            name: None,
            parameter_prefix: None,
            num_layers: parse_var(&lookup, ENV_NUM_LAYERS)?,
            num_input: parse_var(&lookup, ENV_NUM_INPUT)?,
            num_hidden: parse_var(&lookup, ENV_NUM_HIDDEN)?,
            dt: parse_var(&lookup, ENV_DT)?,
            nu: parse_var(&lookup, ENV_NU)?,
            j: parse_var(&lookup, ENV_J)?,
        })
    }

    /// Fill unset fields from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            name: self.name.or(fallback.name),
            parameter_prefix: self.parameter_prefix.or(fallback.parameter_prefix),
            num_layers: self.num_layers.or(fallback.num_layers),
            num_input: self.num_input.or(fallback.num_input),
            num_hidden: self.num_hidden.or(fallback.num_hidden),
            dt: self.dt.or(fallback.dt),
            nu: self.nu.or(fallback.nu),
            j: self.j.or(fallback.j),
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply these overrides on top of `base` and validate the result.
    pub fn resolve(self, base: Option<ReservoirConfig>) -> ReservoirResult<ReservoirConfig> {
        let base_h = base.as_ref().map(|c| c.hamiltonian);
        let config = ReservoirConfig {
            name: self
                .name
                .or_else(|| base.as_ref().map(|c| c.name.clone()))
                .unwrap_or_else(default_name),
            parameter_prefix: self
                .parameter_prefix
                .or_else(|| base.as_ref().map(|c| c.parameter_prefix.clone()))
                .unwrap_or_else(default_parameter_prefix),
            num_layers: required(
                self.num_layers.or(base.as_ref().map(|c| c.num_layers)),
                "num_layers",
                ENV_NUM_LAYERS,
            )?,
            num_input: required(
                self.num_input.or(base.as_ref().map(|c| c.num_input)),
                "num_input",
                ENV_NUM_INPUT,
            )?,
            num_hidden: self
                .num_hidden
                .or(base.as_ref().map(|c| c.num_hidden))
                .unwrap_or_default(),
            hamiltonian: HamiltonianParams::new(
                required(self.dt.or(base_h.map(|h| h.dt)), "dt", ENV_DT)?,
                required(self.nu.or(base_h.map(|h| h.nu)), "nu", ENV_NU)?,
                required(self.j.or(base_h.map(|h| h.j)), "J", ENV_J)?,
            ),
        };
        config.validate()?;
        debug!(?config, "resolved reservoir config");
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ReservoirResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ReservoirError::Config(format!("invalid {key}='{raw}': {e}")))
        })
        .transpose()
}

fn required<T>(value: Option<T>, field: &str, env: &str) -> ReservoirResult<T> {
    value.ok_or_else(|| {
        ReservoirError::Config(format!(
            "{field} is required (set it in the config file or via {env})"
        ))
    })
}
