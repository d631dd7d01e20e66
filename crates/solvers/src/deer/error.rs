use thiserror::Error;

use crate::DimensionError;

use super::ConfigError;

/// Errors that can occur during a DEER solve.
#[derive(Debug, Error)]
pub enum Error {
    /// The config failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An input or the step function disagrees with the declared dimensions.
    #[error("dimension mismatch: {0}")]
    Dimension(#[from] DimensionError),

    /// A state became NaN or infinite under [`Stabilization::Fail`].
    ///
    /// [`Stabilization::Fail`]: crate::stabilize::Stabilization::Fail
    #[error("non-finite state at iteration {iter}, timestep {timestep}, component {component}")]
    NonFinite {
        /// Iteration that produced the value, starting at 1.
        iter: usize,
        /// Row of the state estimate.
        timestep: usize,
        /// Index within the state vector.
        component: usize,
    },
}
