//! Hamiltonian coefficients of the reservoir evolution.
//!
//! The reservoir Hamiltonian is `H = nu * sum_k Z_k + J * sum_{i,h} X_i X_h`,
//! a uniform local field on every qubit plus an XX coupling between each
//! input qubit and each hidden qubit. One layer applies a single first-order
//! Trotter step of length `dt`.

use serde::{Deserialize, Serialize};

use crate::error::{ReservoirError, ReservoirResult};

/// Time step, local-field strength and coupling strength `(dt, nu, J)`.
///
/// Shared by every layer and every qubit of one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianParams {
    /// Trotter time step.
    pub dt: f64,
    /// Local Z field strength.
    pub nu: f64,
    /// Input-hidden XX coupling strength.
    #[serde(alias = "J")]
    pub j: f64,
}

impl HamiltonianParams {
    /// Create a new coefficient triple.
    pub fn new(dt: f64, nu: f64, j: f64) -> Self {
        Self { dt, nu, j }
    }

    /// Reject NaN and infinite coefficients.
    pub fn validate(&self) -> ReservoirResult<()> {
        for (field, value) in [("dt", self.dt), ("nu", self.nu), ("J", self.j)] {
            if !value.is_finite() {
                return Err(ReservoirError::InvalidHamiltonian(format!(
                    "{field} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Rz angle of the local-field term, `2 * dt * nu`.
    #[inline]
    pub fn local_field_angle(&self) -> f64 {
        2.0 * self.dt * self.nu
    }

    /// RXX angle of the coupling term, `2 * J * dt`.
    #[inline]
    pub fn coupling_angle(&self) -> f64 {
        2.0 * self.j * self.dt
    }
}

impl From<(f64, f64, f64)> for HamiltonianParams {
    fn from((dt, nu, j): (f64, f64, f64)) -> Self {
        Self::new(dt, nu, j)
    }
}

impl TryFrom<&[f64]> for HamiltonianParams {
    type Error = ReservoirError;

    fn try_from(values: &[f64]) -> ReservoirResult<Self> {
        match *values {
            [dt, nu, j] => {
                let params = Self::new(dt, nu, j);
                params.validate()?;
                Ok(params)
            }
            _ => Err(ReservoirError::InvalidHamiltonian(format!(
                "expected 3 coefficients (dt, nu, J), got {}",
                values.len()
            ))),
        }
    }
}
