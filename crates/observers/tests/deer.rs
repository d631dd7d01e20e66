use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2, ArrayView1, Axis, array};

use deer_core::{Jacobian, StepFunction};
use deer_observers::{History, ResidualTolerance, TracingObserver};
use deer_solvers::{
    deer::{self, Config, Mode, Status},
    sequential,
};

/// `h_t = tanh(A·h_{t-1} + e_t)` with `A` a rotation scaled by one half.
struct Tanh {
    a: Array2<f64>,
}

impl Tanh {
    fn new() -> Self {
        let (s, c) = 0.9_f64.sin_cos();
        Self {
            a: array![[c, -s], [s, c]] * 0.5,
        }
    }
}

impl StepFunction<f64> for Tanh {
    fn state_dim(&self) -> usize {
        2
    }

    fn driver_dim(&self) -> usize {
        2
    }

    fn step(&self, x: ArrayView1<'_, f64>, e: ArrayView1<'_, f64>) -> Array1<f64> {
        (self.a.dot(&x) + e).mapv(f64::tanh)
    }
}

impl Jacobian<f64> for Tanh {
    fn jacobian(&self, x: ArrayView1<'_, f64>, e: ArrayView1<'_, f64>) -> Array2<f64> {
        let slope = self.step(x, e).mapv(|y| 1.0 - y * y);
        &self.a * &slope.insert_axis(Axis(1))
    }
}

fn drivers() -> Array2<f64> {
    Array2::from_shape_fn((16, 2), |(t, i)| 0.5 * (0.6 * t as f64 + i as f64).sin())
}

#[test]
fn tolerance_stops_once_converged() {
    let f = Tanh::new();
    let initial = array![0.3, -0.1];
    let drivers = drivers();
    let config = Config::new(16, Mode::Full).expect("valid config");

    let solution = deer::solve(
        &f,
        initial.view(),
        Array2::zeros((16, 2)),
        drivers.view(),
        &config,
        ResidualTolerance::new(1e-9),
    )
    .expect("solve succeeds");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert!(solution.iters < 16, "took {} iterations", solution.iters);

    let expected = sequential::evaluate(&f, initial.view(), drivers.view()).expect("evaluates");
    for (got, want) in solution.states.iter().zip(&expected) {
        assert_abs_diff_eq!(got, want, epsilon = 1e-9);
    }
}

#[test]
fn tolerance_respects_min_iters() {
    let f = Tanh::new();
    let initial = array![0.3, -0.1];
    let config = Config::new(16, Mode::Full).expect("valid config");

    let solution = deer::solve(
        &f,
        initial.view(),
        Array2::zeros((16, 2)),
        drivers().view(),
        &config,
        ResidualTolerance::new(1e-9).with_min_iters(7),
    )
    .expect("solve succeeds");

    assert_eq!(solution.iters, 7);
}

#[test]
fn unreachable_tolerance_runs_every_iteration() {
    let f = Tanh::new();
    let config = Config::new(3, Mode::Quasi).expect("valid config");

    let solution = deer::solve(
        &f,
        array![0.3, -0.1].view(),
        Array2::zeros((16, 2)),
        drivers().view(),
        &config,
        ResidualTolerance::new(0.0),
    )
    .expect("solve succeeds");

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.iters, 3);
}

#[test]
fn history_records_each_iteration() {
    let f = Tanh::new();
    let config = Config::new(4, Mode::Full).expect("valid config");
    let mut history = History::new();

    deer::solve(
        &f,
        array![0.3, -0.1].view(),
        Array2::zeros((16, 2)),
        drivers().view(),
        &config,
        history.recorder(),
    )
    .expect("solve succeeds");

    let iters: Vec<_> = history.records().iter().map(|r| r.iter).collect();
    assert_eq!(iters, vec![1, 2, 3, 4]);
    assert!(history.is_monotone());
    assert!(history.last_residual().is_some_and(|r| r < 1e-9));
}

#[test]
fn tracing_observer_never_stops() {
    let f = Tanh::new();
    let config = Config::new(5, Mode::Quasi).expect("valid config");

    let solution = deer::solve(
        &f,
        array![0.3, -0.1].view(),
        Array2::zeros((16, 2)),
        drivers().view(),
        &config,
        TracingObserver::every(2),
    )
    .expect("solve succeeds");

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.iters, 5);
}
