//! Simulation configuration.
//!
//! One immutable value per run, shared by the network builder and the
//! driver. Every node and spring in a run uses these parameters uniformly.

use std::path::Path;

use drape_types::constants::{
    DEFAULT_BENDING_STIFFNESS, DEFAULT_DAMPING, DEFAULT_NODE_MASS, DEFAULT_SUBSTEPS,
    DEFAULT_TIME_STEP, DEFAULT_TRACTION_STIFFNESS, GRAVITY,
};
use drape_types::{DrapeError, DrapeResult, Scalar, Vec3};
use serde::{Deserialize, Serialize};

use crate::integrator::IntegrationMethod;

/// Configuration for a simulation run.
///
/// Loaded from TOML; missing fields fall back to [`Default`], unknown
/// fields and unknown integration methods are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Duration of one tick (seconds).
    pub time_step: Scalar,

    /// Integration sub-steps per tick. The sub-step size is
    /// `time_step / substeps`.
    pub substeps: u32,

    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [Scalar; 3],

    /// Explicit or symplectic Euler.
    pub integration_method: IntegrationMethod,

    /// Mass of every node (kg).
    pub node_mass: Scalar,

    /// Stiffness of springs along mesh edges.
    pub traction_stiffness: Scalar,

    /// Stiffness of springs across shared edges.
    pub bending_stiffness: Scalar,

    /// Damping coefficient for both node drag and spring dampers.
    pub damping: Scalar,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            substeps: DEFAULT_SUBSTEPS,
            gravity: [0.0, -GRAVITY, 0.0],
            integration_method: IntegrationMethod::default(),
            node_mass: DEFAULT_NODE_MASS,
            traction_stiffness: DEFAULT_TRACTION_STIFFNESS,
            bending_stiffness: DEFAULT_BENDING_STIFFNESS,
            damping: DEFAULT_DAMPING,
        }
    }
}

impl SimulationConfig {
    /// Creates a config for debugging: one sub-step, explicit Euler,
    /// no damping, so hand-computed trajectories match exactly.
    pub fn debug() -> Self {
        Self {
            substeps: 1,
            integration_method: IntegrationMethod::Explicit,
            damping: 0.0,
            ..Default::default()
        }
    }

    /// Creates a stiff-cloth config (stiffer springs, more sub-steps).
    pub fn stiff() -> Self {
        Self {
            substeps: 40,
            traction_stiffness: 5000.0,
            bending_stiffness: 500.0,
            ..Default::default()
        }
    }

    /// Sub-step size `h = time_step / substeps`.
    ///
    /// Zero when `substeps == 0`; such a config fails [`validate`](Self::validate).
    pub fn substep_size(&self) -> Scalar {
        if self.substeps == 0 {
            0.0
        } else {
            self.time_step / self.substeps as Scalar
        }
    }

    /// Gravity as a `Vec3`.
    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Checks every parameter against its valid range.
    pub fn validate(&self) -> DrapeResult<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(DrapeError::InvalidConfig(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if self.substeps == 0 {
            return Err(DrapeError::InvalidConfig(
                "substeps must be >= 1".into(),
            ));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(DrapeError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !self.node_mass.is_finite() || self.node_mass <= 0.0 {
            return Err(DrapeError::InvalidConfig(format!(
                "node_mass must be positive, got {}",
                self.node_mass
            )));
        }

        let non_negative = [
            ("traction_stiffness", self.traction_stiffness),
            ("bending_stiffness", self.bending_stiffness),
            ("damping", self.damping),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DrapeError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> DrapeResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DrapeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> DrapeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> DrapeResult<String> {
        toml::to_string(self).map_err(|e| DrapeError::Serialization(e.to_string()))
    }
}
