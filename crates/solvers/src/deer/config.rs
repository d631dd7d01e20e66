use thiserror::Error;

use crate::{scan::ScanStrategy, stabilize::Stabilization};

/// Which Jacobian the solver linearizes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Full `D × D` Jacobian (Newton). Costlier per iteration, usually needs
    /// fewer iterations.
    #[default]
    Full,

    /// Diagonal of the Jacobian (quasi-Newton). Cheaper per iteration and per
    /// combination, weaker when states are strongly coupled.
    Quasi,
}

/// Configuration for the DEER solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    iters: usize,
    mode: Mode,
    scan: ScanStrategy,
    stabilization: Stabilization,
    parallel_linearize: bool,
}

/// Errors that can occur when validating a DEER solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The iteration count is zero.
    #[error("iters must be at least 1")]
    ZeroIters,

    /// A clamp bound is NaN, infinite, zero, or negative.
    #[error("clamp bound must be finite and positive, got {0}")]
    ClampBound(f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iters: 10,
            mode: Mode::Full,
            scan: ScanStrategy::Parallel,
            stabilization: Stabilization::ZeroFill,
            parallel_linearize: true,
        }
    }
}

impl Config {
    /// Creates a config that runs `iters` iterations in `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if `iters` is zero.
    pub fn new(iters: usize, mode: Mode) -> Result<Self, ConfigError> {
        let config = Self {
            iters,
            mode,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets how the prefix scan is scheduled.
    #[must_use]
    pub fn with_scan(self, scan: ScanStrategy) -> Self {
        Self { scan, ..self }
    }

    /// Sets the policy for non-finite values after each scan.
    ///
    /// # Errors
    ///
    /// Returns an error if a clamp bound is not finite and positive.
    pub fn with_stabilization(self, stabilization: Stabilization) -> Result<Self, ConfigError> {
        let config = Self {
            stabilization,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets whether timesteps are linearized on the thread pool.
    #[must_use]
    pub fn with_parallel_linearize(self, parallel_linearize: bool) -> Self {
        Self {
            parallel_linearize,
            ..self
        }
    }

    /// Checks the invariants enforced by the constructors.
    ///
    /// Solvers call this too, since a deserialized config bypasses them.
    ///
    /// # Errors
    ///
    /// Returns an error if `iters` is zero or a clamp bound is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iters == 0 {
            return Err(ConfigError::ZeroIters);
        }
        if let Stabilization::Clamp { bound } = self.stabilization
            && (!bound.is_finite() || bound <= 0.0)
        {
            return Err(ConfigError::ClampBound(bound));
        }
        Ok(())
    }

    /// Returns the number of iterations.
    #[must_use]
    pub fn iters(&self) -> usize {
        self.iters
    }

    /// Returns the linearization mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the scan strategy.
    #[must_use]
    pub fn scan(&self) -> ScanStrategy {
        self.scan
    }

    /// Returns the stabilization policy.
    #[must_use]
    pub fn stabilization(&self) -> Stabilization {
        self.stabilization
    }

    /// Returns whether timesteps are linearized in parallel.
    #[must_use]
    pub fn parallel_linearize(&self) -> bool {
        self.parallel_linearize
    }
}
