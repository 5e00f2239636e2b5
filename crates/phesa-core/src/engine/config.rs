use crate::core::optimize::lbfgs::OptimizerSettings;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight `w` of the pharmacophore Tanimoto; shape gets `1 - w`.
    pub pharmacophore_weight: f64,
    /// Strain energy tolerated above the relaxed baseline before penalizing.
    pub strain_cutoff: f64,
    /// Coefficient `λ` of the squared strain penalty.
    pub strain_penalty: f64,
    /// Include the pharmacophore Tanimoto in the optimizer gradient.
    pub pharmacophore_gradient: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pharmacophore_weight: 0.5,
            strain_cutoff: 10.0,
            strain_penalty: 0.0625,
            pharmacophore_gradient: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-3,
        }
    }
}

impl OptimizationConfig {
    pub fn settings(&self) -> OptimizerSettings {
        OptimizerSettings {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    /// Force constant of the positional restraint.
    pub stiffness: f64,
    /// Restraint radius added per relaxation cycle.
    pub radius_increment: f64,
    pub max_cycles: usize,
    /// Iteration cap of each force-field minimization.
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            stiffness: 50.0,
            radius_increment: 0.2,
            max_cycles: 10,
            max_iterations: 500,
            tolerance: 1e-3,
        }
    }
}

impl RelaxationConfig {
    pub fn settings(&self) -> OptimizerSettings {
        OptimizerSettings {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub steps: usize,
    /// Metropolis temperature in Tanimoto units.
    pub temperature: f64,
    pub seed: u64,
    /// Perturbation magnitude of the least relevant bond, in degrees.
    pub max_perturbation_deg: f64,
    /// Perturbation magnitude of the most relevant bond, in degrees.
    pub min_perturbation_deg: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            steps: 50,
            temperature: 0.0043,
            seed: 1,
            max_perturbation_deg: 60.0,
            min_perturbation_deg: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub scoring: ScoringConfig,
    pub optimization: OptimizationConfig,
    pub relaxation: RelaxationConfig,
    pub monte_carlo: MonteCarloConfig,
}

impl AlignmentConfig {
    /// Reads a TOML file; absent tables and keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = &self.scoring;
        check(
            "pharmacophore_weight",
            (0.0..=1.0).contains(&scoring.pharmacophore_weight),
            "must lie in [0, 1]",
        )?;
        check(
            "strain_cutoff",
            scoring.strain_cutoff.is_finite() && scoring.strain_cutoff >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "strain_penalty",
            scoring.strain_penalty.is_finite() && scoring.strain_penalty >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "optimization.tolerance",
            self.optimization.tolerance > 0.0,
            "must be positive",
        )?;
        check(
            "relaxation.stiffness",
            self.relaxation.stiffness > 0.0,
            "must be positive",
        )?;
        check(
            "relaxation.radius_increment",
            self.relaxation.radius_increment > 0.0,
            "must be positive",
        )?;
        check(
            "relaxation.tolerance",
            self.relaxation.tolerance > 0.0,
            "must be positive",
        )?;
        let mc = &self.monte_carlo;
        check(
            "monte_carlo.temperature",
            mc.temperature > 0.0,
            "must be positive",
        )?;
        check(
            "monte_carlo.min_perturbation_deg",
            mc.min_perturbation_deg > 0.0 && mc.min_perturbation_deg <= mc.max_perturbation_deg,
            "must be positive and not exceed max_perturbation_deg",
        )?;
        check(
            "monte_carlo.max_perturbation_deg",
            mc.max_perturbation_deg <= 180.0,
            "must not exceed 180 degrees",
        )
    }
}

fn check(name: &'static str, ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: reason.to_string(),
        })
    }
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    pharmacophore_weight: Option<f64>,
    strain_cutoff: Option<f64>,
    strain_penalty: Option<f64>,
    pharmacophore_gradient: Option<bool>,
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    relaxation: Option<RelaxationConfig>,
    monte_carlo_steps: Option<usize>,
    temperature: Option<f64>,
    seed: Option<u64>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pharmacophore_weight(mut self, weight: f64) -> Self {
        self.pharmacophore_weight = Some(weight);
        self
    }
    pub fn strain_cutoff(mut self, cutoff: f64) -> Self {
        self.strain_cutoff = Some(cutoff);
        self
    }
    pub fn strain_penalty(mut self, penalty: f64) -> Self {
        self.strain_penalty = Some(penalty);
        self
    }
    pub fn pharmacophore_gradient(mut self, enabled: bool) -> Self {
        self.pharmacophore_gradient = Some(enabled);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn relaxation(mut self, relaxation: RelaxationConfig) -> Self {
        self.relaxation = Some(relaxation);
        self
    }
    pub fn monte_carlo_steps(mut self, steps: usize) -> Self {
        self.monte_carlo_steps = Some(steps);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let defaults = AlignmentConfig::default();
        let config = AlignmentConfig {
            scoring: ScoringConfig {
                pharmacophore_weight: self
                    .pharmacophore_weight
                    .unwrap_or(defaults.scoring.pharmacophore_weight),
                strain_cutoff: self.strain_cutoff.unwrap_or(defaults.scoring.strain_cutoff),
                strain_penalty: self
                    .strain_penalty
                    .unwrap_or(defaults.scoring.strain_penalty),
                pharmacophore_gradient: self
                    .pharmacophore_gradient
                    .unwrap_or(defaults.scoring.pharmacophore_gradient),
            },
            optimization: OptimizationConfig {
                max_iterations: self
                    .max_iterations
                    .unwrap_or(defaults.optimization.max_iterations),
                tolerance: self.tolerance.unwrap_or(defaults.optimization.tolerance),
            },
            relaxation: self.relaxation.unwrap_or(defaults.relaxation),
            monte_carlo: MonteCarloConfig {
                steps: self.monte_carlo_steps.unwrap_or(defaults.monte_carlo.steps),
                temperature: self.temperature.unwrap_or(defaults.monte_carlo.temperature),
                seed: self.seed.unwrap_or(defaults.monte_carlo.seed),
                ..defaults.monte_carlo
            },
        };
        config.validate()?;
        Ok(config)
    }
}
