use ndarray::LinalgScalar;
use num_dual::DualNum;

/// The numeric element type for states, drivers, and operators.
///
/// Implemented by `f64` and by every forward-mode dual number from `num-dual`
/// whose real type is `f64` (`Dual64`, `Dual2_64`, `HyperDual64`, and duals
/// nested inside each other). Code written as `fn f<S: Scalar>(..)` runs
/// unchanged on any of them, which is how derivatives are carried through an
/// entire solve.
///
/// Math functions (`tanh`, `exp`, ...) come from [`DualNum`]. Finiteness and
/// magnitudes are judged on the real part.
///
/// Blanket-implemented for every type meeting the bounds.
pub trait Scalar: DualNum<f64> + LinalgScalar + Send + Sync {
    /// Lifts an `f64` constant into this scalar type.
    #[must_use]
    fn constant(value: f64) -> Self {
        Self::from(value)
    }

    /// Returns true if the real part is neither NaN nor infinite.
    fn is_finite(&self) -> bool {
        self.re().is_finite()
    }
}

impl<T> Scalar for T where T: DualNum<f64> + LinalgScalar + Send + Sync {}
