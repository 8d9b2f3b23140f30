//! The capability shared by every expression node.

use crate::real::Real;
use crate::tape::Tape;

/// The accumulator type an expression propagates into.
pub type Accumulator<E> = <<E as Expr>::Tape as Tape<<E as Expr>::Real>>::Accumulator;

/// A differentiable expression: a leaf or an operation over other expressions.
///
/// Nodes compute their value once, at construction. Propagation is a
/// post-order walk that reaches every operand exactly once and ends in the
/// tape's `push_jacobi` calls at the leaves.
pub trait Expr {
    /// Primal floating point type.
    type Real: Real;
    /// Tape the leaves report their gradient data to.
    type Tape: Tape<Self::Real>;

    /// Returns the memoized value of the expression.
    fn value(&self) -> Self::Real;

    /// Propagates the derivative of this expression into `acc`.
    fn calc_gradient(&self, tape: &mut Self::Tape, acc: &mut Accumulator<Self>);

    /// Propagates the derivative of this expression times `multiplier` into
    /// `acc`.
    fn calc_gradient_scaled(
        &self,
        tape: &mut Self::Tape,
        acc: &mut Accumulator<Self>,
        multiplier: Self::Real,
    );
}

/// The right-hand side of an assignment to an active value.
///
/// Each implementor picks the matching [`Tape`] store routine: expressions go
/// through [`Tape::store`], other active values through
/// [`Tape::store_active`] and constants through [`Tape::store_passive`].
pub trait StoreRhs<T: Real, Tp: Tape<T>> {
    /// Stores `self` into the given value and gradient data.
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData);
}
