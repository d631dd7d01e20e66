//! Handling of non-finite values in a freshly scanned state estimate.
//!
//! Long chains of matrix products can overflow before the solver converges.
//! Because the next iteration linearizes around the current estimate, a single
//! NaN would otherwise spread to every later iteration.

use ndarray::{Array, Array2, Dimension};
use thiserror::Error;

use deer_core::Scalar;

/// What to do with non-finite entries in a state estimate.
///
/// Replacing values discards information. It keeps the iteration going, but
/// it can also hide genuine divergence; [`Stabilization::Fail`] surfaces it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stabilization {
    /// Replace NaN and ±∞ with zero.
    #[default]
    ZeroFill,

    /// Replace NaN with zero and limit every entry to `[-bound, bound]`.
    ///
    /// Dual numbers are compared by their real part, and a replaced entry
    /// loses its derivative.
    Clamp {
        /// Largest allowed magnitude; must be finite and positive.
        bound: f64,
    },

    /// Stop the solve at the first non-finite entry.
    Fail,
}

/// Location of the first non-finite entry found under [`Stabilization::Fail`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("non-finite state at timestep {timestep}, component {component}")]
pub struct NonFinite {
    /// Row of the state estimate (timestep `t` is `h_{t+1}`).
    pub timestep: usize,

    /// Index within the state vector.
    pub component: usize,
}

/// Applies `policy` to `states` in place and returns how many entries changed.
///
/// Every policy is idempotent, and finite entries within bounds are never
/// touched.
///
/// # Errors
///
/// Returns [`NonFinite`] under [`Stabilization::Fail`] if any entry is NaN or
/// infinite. `states` is left unchanged in that case.
pub fn stabilize<S: Scalar>(
    states: &mut Array2<S>,
    policy: Stabilization,
) -> Result<usize, NonFinite> {
    match policy {
        Stabilization::ZeroFill => Ok(zero_non_finite(states)),
        Stabilization::Clamp { bound } => Ok(clamp(states, bound)),
        Stabilization::Fail => match states.indexed_iter().find(|(_, v)| !v.is_finite()) {
            Some(((timestep, component), _)) => Err(NonFinite {
                timestep,
                component,
            }),
            None => Ok(0),
        },
    }
}

/// Replaces every NaN and ±∞ in `values` with zero, returning the count.
pub fn zero_non_finite<S: Scalar, D: Dimension>(values: &mut Array<S, D>) -> usize {
    replace(values, |v| (!v.is_finite()).then(S::zero))
}

/// Replaces NaN with zero and limits real parts to `±bound`, returning the
/// count.
///
/// A bound that is not finite and positive acts as `f64::MAX`, so every entry
/// is finite afterwards.
fn clamp<S: Scalar, D: Dimension>(values: &mut Array<S, D>, bound: f64) -> usize {
    let bound = if bound.is_finite() && bound > 0.0 {
        bound
    } else {
        f64::MAX
    };
    replace(values, |v| {
        let re = v.re();
        if re.is_nan() {
            Some(S::zero())
        } else if re > bound {
            Some(S::constant(bound))
        } else if re < -bound {
            Some(S::constant(-bound))
        } else {
            None
        }
    })
}

fn replace<S: Scalar, D: Dimension>(
    values: &mut Array<S, D>,
    rule: impl Fn(S) -> Option<S>,
) -> usize {
    let mut replaced = 0;
    values.map_inplace(|v| {
        if let Some(new) = rule(*v) {
            *v = new;
            replaced += 1;
        }
    });
    replaced
}
