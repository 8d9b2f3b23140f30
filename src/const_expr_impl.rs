use std::fmt;

use crate::expr::{Accumulator, Expr, StoreRhs};
use crate::real::Real;
use crate::tape::Tape;

use super::Const;

impl<T: Real, Tp> Clone for Const<T, Tp> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Real, Tp> Copy for Const<T, Tp> {}

impl<T: Real, Tp> fmt::Debug for Const<T, Tp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Const({:?})", self.value)
    }
}

impl<Tp> From<f64> for Const<f64, Tp> {
    /// Converts a `f64` into a constant expression.
    fn from(v: f64) -> Self {
        Const::new(v)
    }
}

impl<Tp> From<f32> for Const<f32, Tp> {
    /// Converts a `f32` into a constant expression.
    fn from(v: f32) -> Self {
        Const::new(v)
    }
}

impl<T: Real, Tp: Tape<T>> Expr for Const<T, Tp> {
    type Real = T;
    type Tape = Tp;

    #[inline]
    fn value(&self) -> T {
        T::from_passive(self.value)
    }

    /// Constants have no gradient; the tape only hears about the value.
    #[inline]
    fn calc_gradient(&self, tape: &mut Tp, _: &mut Accumulator<Self>) {
        tape.push_passive(self.value);
    }

    #[inline]
    fn calc_gradient_scaled(&self, tape: &mut Tp, _: &mut Accumulator<Self>, _: T) {
        tape.push_passive(self.value);
    }
}

impl<T: Real, Tp: Tape<T>> StoreRhs<T, Tp> for Const<T, Tp> {
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store_passive(value, gradient_data, self.value);
    }
}
