//! The interface every tape implements.
//!
//! Active values notify the tape when they are created, assigned or dropped.
//! Expressions never know which differentiation mode they run under: during a
//! store they only hand their leaves' gradient data back to the tape through
//! [`Tape::push_jacobi`] / [`Tape::push_jacobi_scaled`]. Whatever the tape does
//! with those contributions (accumulate a tangent immediately, record them for
//! a later reverse sweep) is its own business.

use std::fmt;

use crate::expr::Expr;
use crate::real::Real;

/// Common interface of all tapes.
///
/// `T` is the floating point type of the primal values and of the gradients.
pub trait Tape<T: Real>: Sized {
    /// Per-variable handle the tape uses to identify an active value and to
    /// find its gradient.
    type GradientData: Default + fmt::Debug;

    /// What contributions are accumulated into while an expression is being
    /// stored.
    type Accumulator;

    /// Handles `lhs = rhs` for a general expression.
    ///
    /// Sets `lhs_value` to the value of `rhs` and updates `lhs_gradient_data`
    /// by letting `rhs` propagate its Jacobians.
    fn store<E>(&mut self, lhs_value: &mut T, lhs_gradient_data: &mut Self::GradientData, rhs: &E)
    where
        E: Expr<Real = T, Tape = Self>;

    /// Handles `lhs = rhs` where `rhs` is another active value.
    fn store_active(
        &mut self,
        lhs_value: &mut T,
        lhs_gradient_data: &mut Self::GradientData,
        rhs_value: &T,
        rhs_gradient_data: &Self::GradientData,
    );

    /// Handles `lhs = rhs` where `rhs` is a passive constant.
    fn store_passive(
        &mut self,
        lhs_value: &mut T,
        lhs_gradient_data: &mut Self::GradientData,
        rhs: T::Passive,
    );

    /// Called for every passive value that takes part in a stored expression.
    #[inline]
    fn push_passive(&mut self, _value: T::Passive) {}

    /// Adds the contribution of an operand whose Jacobian is exactly one.
    fn push_jacobi(
        &mut self,
        acc: &mut Self::Accumulator,
        value: &T,
        gradient_data: &Self::GradientData,
    );

    /// Adds `jacobi` times the gradient behind `gradient_data`.
    fn push_jacobi_scaled(
        &mut self,
        acc: &mut Self::Accumulator,
        jacobi: T,
        value: &T,
        gradient_data: &Self::GradientData,
    );

    /// Called when an active value is constructed.
    fn init_gradient_data(&mut self, value: &mut T, gradient_data: &mut Self::GradientData);

    /// Called exactly once when an active value goes away.
    fn destroy_gradient_data(&mut self, value: &mut T, gradient_data: &mut Self::GradientData);

    /// Overwrites the gradient behind `gradient_data`.
    fn set_gradient(&mut self, gradient_data: &mut Self::GradientData, gradient: T);

    /// Reads the gradient behind `gradient_data`.
    fn get_gradient(&self, gradient_data: &Self::GradientData) -> T;

    /// Mutable access to the gradient behind `gradient_data`.
    fn gradient<'a>(&'a mut self, gradient_data: &'a mut Self::GradientData) -> &'a mut T;
}

/// A tape with one instance per thread that active values talk to implicitly.
pub trait GlobalTape<T: Real>: Tape<T> {
    /// Runs `f` with this thread's tape.
    ///
    /// Implementations backed by a `RefCell` must not be re-entered from `f`.
    fn with_tape<R>(f: impl FnOnce(&mut Self) -> R) -> R;
}
