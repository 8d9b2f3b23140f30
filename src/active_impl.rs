use std::fmt;
use std::cmp::Ordering;

use num_traits::Zero;

use crate::const_expr::Const;
use crate::expr::{Accumulator, Expr, StoreRhs};
use crate::node::{BinExpr, UnExpr};
use crate::real::Real;
use crate::registry::{BinaryFnExpr, UnaryFnExpr};
use crate::tape::GlobalTape;

use super::Active;

impl<T: Real, Tp: GlobalTape<T>> Default for Active<T, Tp> {
    fn default() -> Self {
        Self::new(Zero::zero())
    }
}

impl<T: Real, Tp: GlobalTape<T>> Clone for Active<T, Tp> {
    /// Copies value and gradient through the tape's active-to-active store.
    fn clone(&self) -> Self {
        Self::from_rhs(self)
    }
}

impl<T: Real, Tp: GlobalTape<T>> fmt::Debug for Active<T, Tp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Active({:?}, {:?})", self.value, self.gradient_data)
    }
}

impl<T: Real, Tp: GlobalTape<T>> fmt::Display for Active<T, Tp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: Real, Tp: GlobalTape<T>> Expr for Active<T, Tp> {
    type Real = T;
    type Tape = Tp;

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn calc_gradient(&self, tape: &mut Tp, acc: &mut Accumulator<Self>) {
        tape.push_jacobi(acc, &self.value, &self.gradient_data);
    }

    #[inline]
    fn calc_gradient_scaled(&self, tape: &mut Tp, acc: &mut Accumulator<Self>, multiplier: T) {
        tape.push_jacobi_scaled(acc, multiplier, &self.value, &self.gradient_data);
    }
}

impl<'a, T: Real, Tp: GlobalTape<T>> Expr for &'a Active<T, Tp> {
    type Real = T;
    type Tape = Tp;

    #[inline]
    fn value(&self) -> T {
        self.value
    }

    #[inline]
    fn calc_gradient(&self, tape: &mut Tp, acc: &mut Accumulator<Self>) {
        tape.push_jacobi(acc, &self.value, &self.gradient_data);
    }

    #[inline]
    fn calc_gradient_scaled(&self, tape: &mut Tp, acc: &mut Accumulator<Self>, multiplier: T) {
        tape.push_jacobi_scaled(acc, multiplier, &self.value, &self.gradient_data);
    }
}

impl<T: Real, Tp: GlobalTape<T>> StoreRhs<T, Tp> for Active<T, Tp> {
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store_active(value, gradient_data, &self.value, &self.gradient_data);
    }
}

impl<'a, T: Real, Tp: GlobalTape<T>> StoreRhs<T, Tp> for &'a Active<T, Tp> {
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store_active(value, gradient_data, &self.value, &self.gradient_data);
    }
}

impl<'a, T: Real, Tp: GlobalTape<T>> From<&'a Active<T, Tp>> for Active<T, Tp> {
    fn from(other: &'a Active<T, Tp>) -> Self {
        other.clone()
    }
}

impl<T, Tp, A, O> From<UnExpr<A, O>> for Active<T, Tp>
where
    T: Real,
    Tp: GlobalTape<T>,
    A: Expr,
    UnExpr<A, O>: StoreRhs<T, Tp>,
{
    /// Stores a unary expression into a new active value.
    fn from(e: UnExpr<A, O>) -> Self {
        Self::from_rhs(&e)
    }
}

impl<T, Tp, L, R, O> From<BinExpr<L, R, O>> for Active<T, Tp>
where
    T: Real,
    Tp: GlobalTape<T>,
    L: Expr,
    BinExpr<L, R, O>: StoreRhs<T, Tp>,
{
    /// Stores a binary expression into a new active value.
    fn from(e: BinExpr<L, R, O>) -> Self {
        Self::from_rhs(&e)
    }
}

impl<T, Tp, A> From<UnaryFnExpr<A>> for Active<T, Tp>
where
    T: Real,
    Tp: GlobalTape<T>,
    A: Expr,
    UnaryFnExpr<A>: StoreRhs<T, Tp>,
{
    fn from(e: UnaryFnExpr<A>) -> Self {
        Self::from_rhs(&e)
    }
}

impl<T, Tp, L, R> From<BinaryFnExpr<L, R>> for Active<T, Tp>
where
    T: Real,
    Tp: GlobalTape<T>,
    L: Expr,
    BinaryFnExpr<L, R>: StoreRhs<T, Tp>,
{
    fn from(e: BinaryFnExpr<L, R>) -> Self {
        Self::from_rhs(&e)
    }
}

impl<T: Real, Tp: GlobalTape<T>> From<Const<T, Tp>> for Active<T, Tp> {
    fn from(c: Const<T, Tp>) -> Self {
        Self::from_rhs(&c)
    }
}

impl<T: Real, Tp: GlobalTape<T>> PartialEq for Active<T, Tp> {
    fn eq(&self, o: &Self) -> bool {
        self.value == o.value
    }
}

impl<T: Real, Tp: GlobalTape<T>> PartialOrd for Active<T, Tp> {
    fn partial_cmp(&self, o: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&o.value)
    }
}

macro_rules! impl_passive {
    ($P:ty) => {
        impl<Tp: GlobalTape<$P>> StoreRhs<$P, Tp> for $P {
            fn store_into(
                &self,
                tape: &mut Tp,
                value: &mut $P,
                gradient_data: &mut Tp::GradientData,
            ) {
                tape.store_passive(value, gradient_data, *self);
            }
        }

        impl<Tp: GlobalTape<$P>> From<$P> for Active<$P, Tp> {
            /// Creates an active value with a zero gradient.
            fn from(v: $P) -> Self {
                Active::new(v)
            }
        }

        impl<Tp: GlobalTape<$P>> PartialEq<$P> for Active<$P, Tp> {
            fn eq(&self, rhs: &$P) -> bool {
                self.value == *rhs
            }
        }

        impl<Tp: GlobalTape<$P>> PartialOrd<$P> for Active<$P, Tp> {
            fn partial_cmp(&self, rhs: &$P) -> Option<Ordering> {
                self.value.partial_cmp(rhs)
            }
        }
    };
}

impl_passive!(f64);
impl_passive!(f32);
