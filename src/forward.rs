//! Tape for the tangent (forward) AD mode.
//!
//! For each statement `y = f(x)` the tape evaluates `ẏ = df/dx(x) · ẋ` right
//! away and stores it as the gradient data of `y`. Nothing is recorded, so the
//! gradient data of an active value simply is its tangent.

use std::fmt;
use std::marker::PhantomData;

use log::trace;

use crate::expr::Expr;
use crate::real::Real;
use crate::tape::{GlobalTape, Tape};

/// Forward-mode tape. Holds no state.
pub struct ForwardTape<T> {
    _real: PhantomData<fn() -> T>,
}

impl<T> ForwardTape<T> {
    pub fn new() -> Self {
        Self { _real: PhantomData }
    }
}

impl<T> Default for ForwardTape<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ForwardTape<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ForwardTape<T> {}

impl<T> fmt::Debug for ForwardTape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ForwardTape")
    }
}

impl<T: Real> Tape<T> for ForwardTape<T> {
    type GradientData = T;
    type Accumulator = T;

    #[inline]
    fn store<E>(&mut self, lhs_value: &mut T, lhs_tangent: &mut T, rhs: &E)
    where
        E: Expr<Real = T, Tape = Self>,
    {
        *lhs_tangent = T::zero();
        rhs.calc_gradient(self, lhs_tangent);
        *lhs_value = rhs.value();
        trace!("forward store: value = {}, tangent = {}", lhs_value, lhs_tangent);
    }

    #[inline]
    fn store_active(
        &mut self,
        lhs_value: &mut T,
        lhs_tangent: &mut T,
        rhs_value: &T,
        rhs_tangent: &T,
    ) {
        *lhs_tangent = *rhs_tangent;
        *lhs_value = *rhs_value;
        trace!("forward copy: value = {}, tangent = {}", lhs_value, lhs_tangent);
    }

    #[inline]
    fn store_passive(&mut self, lhs_value: &mut T, lhs_tangent: &mut T, rhs: T::Passive) {
        *lhs_tangent = T::zero();
        *lhs_value = T::from_passive(rhs);
        trace!("forward constant: value = {}", lhs_value);
    }

    #[inline]
    fn push_jacobi(&mut self, lhs_tangent: &mut T, _value: &T, cur_tangent: &T) {
        *lhs_tangent += *cur_tangent;
    }

    #[inline]
    fn push_jacobi_scaled(&mut self, lhs_tangent: &mut T, jacobi: T, _value: &T, cur_tangent: &T) {
        *lhs_tangent += jacobi * *cur_tangent;
    }

    #[inline]
    fn init_gradient_data(&mut self, _value: &mut T, tangent: &mut T) {
        *tangent = T::zero();
    }

    #[inline]
    fn destroy_gradient_data(&mut self, _value: &mut T, _tangent: &mut T) {}

    #[inline]
    fn set_gradient(&mut self, tangent: &mut T, new_tangent: T) {
        *tangent = new_tangent;
    }

    #[inline]
    fn get_gradient(&self, tangent: &T) -> T {
        *tangent
    }

    #[inline]
    fn gradient<'a>(&'a mut self, tangent: &'a mut T) -> &'a mut T {
        tangent
    }
}

impl<T: Real> GlobalTape<T> for ForwardTape<T> {
    #[inline]
    fn with_tape<R>(f: impl FnOnce(&mut Self) -> R) -> R {
        f(&mut ForwardTape::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::const_expr::Const;

    #[test]
    fn push_jacobi_accumulates() {
        let mut tape = ForwardTape::<f64>::new();
        let mut acc = 1.0;
        tape.push_jacobi(&mut acc, &10.0, &2.0);
        tape.push_jacobi_scaled(&mut acc, 3.0, &10.0, &0.5);
        assert_eq!(acc, 4.5);
    }

    #[test]
    fn store_passive_zeroes_tangent() {
        let mut tape = ForwardTape::<f64>::new();
        let (mut value, mut tangent) = (1.0, 7.0);
        tape.store_passive(&mut value, &mut tangent, 1e300);
        assert_eq!(value, 1e300);
        assert_eq!(tangent, 0.0);
    }

    #[test]
    fn store_resets_stale_tangent() {
        let mut tape = ForwardTape::<f64>::new();
        let (mut value, mut tangent) = (0.0, 42.0);
        let rhs = Const::<f64, ForwardTape<f64>>::new(2.5);
        tape.store(&mut value, &mut tangent, &rhs);
        assert_eq!(value, 2.5);
        assert_eq!(tangent, 0.0);
    }

    #[test]
    fn gradient_access() {
        let mut tape = ForwardTape::<f32>::new();
        let mut tangent = 0.0f32;
        tape.init_gradient_data(&mut 1.0, &mut tangent);
        tape.set_gradient(&mut tangent, 2.0);
        *tape.gradient(&mut tangent) += 1.0;
        assert_eq!(tape.get_gradient(&tangent), 3.0);
        tape.destroy_gradient_data(&mut 1.0, &mut tangent);
        assert_eq!(tangent, 3.0);
    }
}
