//! Constant expression type.

use std::marker::PhantomData;

use crate::real::Real;

/// A passive value used as an expression leaf.
///
/// Constants carry no gradient data; during propagation they only announce
/// themselves through [`Tape::push_passive`](crate::tape::Tape::push_passive).
pub struct Const<T: Real, Tp> {
    value: T::Passive,
    _tape: PhantomData<fn() -> Tp>,
}

impl<T: Real, Tp> Const<T, Tp> {
    #[inline]
    pub fn new(value: T::Passive) -> Self {
        Self {
            value,
            _tape: PhantomData,
        }
    }

    /// Returns the wrapped passive value.
    #[inline]
    pub fn passive(&self) -> T::Passive {
        self.value
    }
}

#[path = "const_expr_impl.rs"]
mod const_expr_impl;
