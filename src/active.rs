//! Active values: the variables whose derivatives are tracked.

use crate::expr::StoreRhs;
use crate::forward::ForwardTape;
use crate::real::Real;
use crate::tape::GlobalTape;

/// A floating point value that carries gradient data managed by `Tp`.
///
/// Every lifecycle event goes through the thread's tape: construction
/// initialises the gradient data, assignment stores the right-hand side and
/// dropping destroys the gradient data.
pub struct Active<T: Real, Tp: GlobalTape<T> = ForwardTape<T>> {
    value: T,
    gradient_data: Tp::GradientData,
}

impl<T: Real, Tp: GlobalTape<T>> Active<T, Tp> {
    /// Creates an active value with a zero gradient.
    pub fn new(value: T::Passive) -> Self {
        let mut value = T::from_passive(value);
        let mut gradient_data = Tp::GradientData::default();
        Tp::with_tape(|tape| tape.init_gradient_data(&mut value, &mut gradient_data));
        Self {
            value,
            gradient_data,
        }
    }

    /// Creates an active value holding the result of `rhs`.
    pub fn from_rhs<R: StoreRhs<T, Tp> + ?Sized>(rhs: &R) -> Self {
        let mut value = T::zero();
        let mut gradient_data = Tp::GradientData::default();
        Tp::with_tape(|tape| {
            tape.init_gradient_data(&mut value, &mut gradient_data);
            rhs.store_into(tape, &mut value, &mut gradient_data);
        });
        Self {
            value,
            gradient_data,
        }
    }

    /// Assigns `rhs`, picking the tape's store routine from its type.
    pub fn assign<R: StoreRhs<T, Tp>>(&mut self, rhs: R) {
        let Self {
            value,
            gradient_data,
        } = self;
        Tp::with_tape(|tape| rhs.store_into(tape, value, gradient_data));
    }

    #[inline]
    /// Returns the primal value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Returns the gradient (the tangent under forward mode).
    pub fn gradient(&self) -> T {
        Tp::with_tape(|tape| tape.get_gradient(&self.gradient_data))
    }

    /// Overwrites the gradient, e.g. to seed a forward sweep.
    pub fn set_gradient(&mut self, gradient: T) {
        let gradient_data = &mut self.gradient_data;
        Tp::with_tape(|tape| tape.set_gradient(gradient_data, gradient));
    }

    /// Runs `f` on a mutable reference to the gradient.
    pub fn update_gradient<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let gradient_data = &mut self.gradient_data;
        Tp::with_tape(|tape| f(tape.gradient(gradient_data)))
    }

    /// The tape's handle for this value.
    pub fn gradient_data(&self) -> &Tp::GradientData {
        &self.gradient_data
    }
}

impl<T: Real, Tp: GlobalTape<T>> Drop for Active<T, Tp> {
    fn drop(&mut self) {
        let Self {
            value,
            gradient_data,
        } = self;
        Tp::with_tape(|tape| tape.destroy_gradient_data(value, gradient_data));
    }
}

#[path = "active_impl.rs"]
mod active_impl;
