//! Affine operators `x ↦ A·x + b` and their associative composition.
//!
//! Two representations are provided:
//!
//! - [`DenseAffine`]: `A` is a full `D × D` matrix
//! - [`DiagonalAffine`]: `A` is a length-`D` vector acting elementwise
//!
//! For an operator `g_i` earlier in a sequence and `g_j` later,
//! [`AffineOperator::combine`] returns the operator for `g_j(g_i(x))`:
//!
//! ```text
//! A_out = A_j · A_i
//! b_out = A_j · b_i + b_j
//! ```
//!
//! Composition is associative, which is what lets a prefix scan combine
//! operators in any tree shape and still match left-to-right application.

use ndarray::{Array1, Array2, ArrayView1};

use deer_core::Scalar;

/// An affine map that can be composed with another of the same kind.
pub trait AffineOperator<S: Scalar>: Clone + Send + Sync {
    /// Returns the constant map `x ↦ offset` (zero linear part).
    #[must_use]
    fn constant(offset: Array1<S>) -> Self;

    /// Returns the state dimension `D`.
    fn dim(&self) -> usize;

    /// Returns the offset `b`.
    fn offset(&self) -> ArrayView1<'_, S>;

    /// Consumes the operator, returning its offset.
    #[must_use]
    fn into_offset(self) -> Array1<S>;

    /// Composes `self` (applied first) with `later` (applied second).
    #[must_use]
    fn combine(&self, later: &Self) -> Self;

    /// Applies the map to `x`.
    #[must_use]
    fn apply(&self, x: ArrayView1<'_, S>) -> Array1<S>;
}

/// An affine operator with a dense linear part.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseAffine<S> {
    /// The `D × D` linear part.
    pub linear: Array2<S>,

    /// The length-`D` offset.
    pub offset: Array1<S>,
}

impl<S> DenseAffine<S> {
    /// Creates a dense operator from its parts.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the shapes disagree.
    pub fn new(linear: Array2<S>, offset: Array1<S>) -> Self {
        debug_assert_eq!(linear.dim(), (offset.len(), offset.len()));
        Self { linear, offset }
    }
}

impl<S: Scalar> AffineOperator<S> for DenseAffine<S> {
    fn constant(offset: Array1<S>) -> Self {
        let dim = offset.len();
        Self::new(Array2::zeros((dim, dim)), offset)
    }

    fn dim(&self) -> usize {
        self.offset.len()
    }

    fn offset(&self) -> ArrayView1<'_, S> {
        self.offset.view()
    }

    fn into_offset(self) -> Array1<S> {
        self.offset
    }

    fn combine(&self, later: &Self) -> Self {
        Self {
            linear: later.linear.dot(&self.linear),
            offset: later.linear.dot(&self.offset) + &later.offset,
        }
    }

    fn apply(&self, x: ArrayView1<'_, S>) -> Array1<S> {
        self.linear.dot(&x) + &self.offset
    }
}

/// An affine operator with a diagonal linear part.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalAffine<S> {
    /// The diagonal of the linear part.
    pub linear: Array1<S>,

    /// The length-`D` offset.
    pub offset: Array1<S>,
}

impl<S> DiagonalAffine<S> {
    /// Creates a diagonal operator from its parts.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the lengths disagree.
    pub fn new(linear: Array1<S>, offset: Array1<S>) -> Self {
        debug_assert_eq!(linear.len(), offset.len());
        Self { linear, offset }
    }
}

impl<S: Scalar> AffineOperator<S> for DiagonalAffine<S> {
    fn constant(offset: Array1<S>) -> Self {
        Self::new(Array1::zeros(offset.len()), offset)
    }

    fn dim(&self) -> usize {
        self.offset.len()
    }

    fn offset(&self) -> ArrayView1<'_, S> {
        self.offset.view()
    }

    fn into_offset(self) -> Array1<S> {
        self.offset
    }

    fn combine(&self, later: &Self) -> Self {
        Self {
            linear: &later.linear * &self.linear,
            offset: &later.linear * &self.offset + &later.offset,
        }
    }

    fn apply(&self, x: ArrayView1<'_, S>) -> Array1<S> {
        &self.linear * &x + &self.offset
    }
}
