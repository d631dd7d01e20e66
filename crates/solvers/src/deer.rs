//! The DEER fixed-point solver for nonlinear recurrences.
//!
//! # Algorithm
//!
//! Given a step function `f`, a fixed initial state `h_0`, drivers
//! `e_1..e_L`, and a guess for `h_1..h_L`, each iteration:
//!
//! 1. Linearizes `f` around every guessed state in parallel, producing one
//!    affine operator per timestep. Operator 0 is the exact constant map to
//!    `f(h_0, e_1)`.
//! 2. Composes all operators with a parallel prefix scan. Because operator 0
//!    has no linear part, the offset of prefix `t` is the new estimate of
//!    `h_{t+1}`.
//! 3. Stabilizes the new estimate (see [`Stabilization`]).
//! 4. Replaces the guess with the new estimate.
//!
//! Each iteration is a Newton step on the whole sequence, solved in
//! logarithmic depth. After `k` iterations the first `k` states are exact, and
//! contracting dynamics typically converge in far fewer iterations than `L`.
//!
//! # Modes
//!
//! - [`Mode::Full`]: dense Jacobians and [`DenseAffine`] operators
//! - [`Mode::Quasi`]: Jacobian diagonals and [`DiagonalAffine`] operators
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] after every iteration, carrying the new
//! estimate and its residual (largest change from the previous estimate).
//! Observers may return [`Action::StopEarly`] to end the solve there. Without
//! an observer the solver always runs exactly [`Config::iters`] iterations.
//!
//! # Differentiation
//!
//! Every routine is generic over [`Scalar`], so running the solver on dual
//! numbers propagates derivatives through all iterations.
//!
//! [`Stabilization`]: crate::stabilize::Stabilization

mod action;
mod config;
mod error;
mod event;
mod prepare;
mod sequence;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError, Mode};
pub use error::Error;
pub use event::Event;
pub use sequence::Sequence;
pub use solution::{Solution, Status};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use rayon::prelude::*;
use tracing::{debug, warn};

use deer_core::{Jacobian, Observer, Scalar};

use crate::{
    affine::{AffineOperator, DenseAffine, DiagonalAffine},
    linearize::{Tangent, linearize},
    scan::associative_scan,
    stabilize::stabilize,
};

use prepare::prepare;

/// Solves the recurrence defined by `f` from `initial` over `drivers`.
///
/// `guess` has shape `(L, D)` and seeds the first linearization; zeros are a
/// fine default, and a nearby solution (a warm start) converges faster.
///
/// The observer receives an [`Event`] after each iteration.
/// See the [module docs](self) for details.
///
/// # Errors
///
/// Returns an error if the config is invalid, if any shape disagrees with the
/// dimensions declared by `f`, or if [`Stabilization::Fail`] finds a
/// non-finite state.
///
/// [`Stabilization::Fail`]: crate::stabilize::Stabilization::Fail
#[tracing::instrument(
    skip_all,
    fields(len = drivers.nrows(), dim = f.state_dim(), mode = ?config.mode())
)]
pub fn solve<S, F, Obs>(
    f: &F,
    initial: ArrayView1<'_, S>,
    guess: Array2<S>,
    drivers: ArrayView2<'_, S>,
    config: &Config,
    observer: Obs,
) -> Result<Solution<S>, Error>
where
    S: Scalar,
    F: Jacobian<S> + Sync + ?Sized,
    Obs: for<'a> Observer<Event<'a, S>, Action>,
{
    config.validate()?;
    let anchor = prepare(f, initial, guess.view(), drivers, config.mode())?;

    match config.mode() {
        Mode::Full => {
            iterate::<S, DenseAffine<S>, F, Obs>(f, &anchor, guess, drivers, config, observer)
        }
        Mode::Quasi => {
            iterate::<S, DiagonalAffine<S>, F, Obs>(f, &anchor, guess, drivers, config, observer)
        }
    }
}

/// Solves the recurrence without observation.
///
/// This is a convenience wrapper around [`solve`] that runs exactly
/// [`Config::iters`] iterations.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<S, F>(
    f: &F,
    initial: ArrayView1<'_, S>,
    guess: Array2<S>,
    drivers: ArrayView2<'_, S>,
    config: &Config,
) -> Result<Solution<S>, Error>
where
    S: Scalar,
    F: Jacobian<S> + Sync + ?Sized,
{
    solve(f, initial, guess, drivers, config, ())
}

/// Solves independent sequences on the rayon thread pool.
///
/// Solutions are returned in the order of `batch`. Each sequence is solved
/// with [`solve_unobserved`].
///
/// # Errors
///
/// Returns the first error encountered by any sequence.
#[tracing::instrument(skip_all, fields(batch = batch.len(), mode = ?config.mode()))]
pub fn solve_batch<S, F>(
    f: &F,
    batch: &[Sequence<S>],
    config: &Config,
) -> Result<Vec<Solution<S>>, Error>
where
    S: Scalar,
    F: Jacobian<S> + Sync + ?Sized,
{
    batch
        .par_iter()
        .map(|seq| {
            solve_unobserved(
                f,
                seq.initial.view(),
                seq.guess.clone(),
                seq.drivers.view(),
                config,
            )
        })
        .collect()
}

/// Runs the linearize → scan → stabilize loop with operator type `Op`.
fn iterate<S, Op, F, Obs>(
    f: &F,
    anchor: &Array1<S>,
    guess: Array2<S>,
    drivers: ArrayView2<'_, S>,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<S>, Error>
where
    S: Scalar,
    Op: Tangent<S>,
    F: Jacobian<S> + Sync + ?Sized,
    Obs: for<'a> Observer<Event<'a, S>, Action>,
{
    let dim = guess.ncols();
    let mut states = guess;

    for iter in 1..=config.iters() {
        let ops: Vec<Op> = linearize(
            f,
            anchor,
            drivers,
            states.view(),
            config.parallel_linearize(),
        );
        let prefixes = associative_scan(ops, |a: &Op, b: &Op| a.combine(b), config.scan());

        let mut next = offsets(prefixes, dim);
        let replaced =
            stabilize(&mut next, config.stabilization()).map_err(|e| Error::NonFinite {
                iter,
                timestep: e.timestep,
                component: e.component,
            })?;
        if replaced > 0 {
            warn!(iter, replaced, "replaced non-finite state entries");
        }

        let residual = max_abs_change(&next, &states);
        debug!(iter, residual, "iteration complete");
        states = next;

        let event = Event {
            iter,
            states: states.view(),
            residual,
            replaced,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                states,
                iters: iter,
            });
        }
    }

    Ok(Solution {
        status: Status::Complete,
        states,
        iters: config.iters(),
    })
}

/// Stacks the offsets of the prefix operators into an `(L, D)` estimate.
fn offsets<S: Scalar, Op: AffineOperator<S>>(prefixes: Vec<Op>, dim: usize) -> Array2<S> {
    let mut states = Array2::zeros((prefixes.len(), dim));
    for (mut row, op) in states.rows_mut().into_iter().zip(prefixes) {
        row.assign(&op.into_offset());
    }
    states
}

/// Largest absolute difference between the real parts of two estimates.
///
/// NaN differences count as infinite.
fn max_abs_change<S: Scalar>(next: &Array2<S>, prev: &Array2<S>) -> f64 {
    Zip::from(next).and(prev).fold(0.0_f64, |acc, n, p| {
        let change = (n.re() - p.re()).abs();
        if change.is_nan() { f64::INFINITY } else { acc.max(change) }
    })
}
