use std::mem;
use std::ops::*;

use crate::active::Active;
use crate::const_expr::Const;
use crate::expr::Expr;
use crate::node::{BinExpr, UnExpr};
use crate::ops::{AddOp, DivOp, MulOp, NegOp, SubOp};
use crate::real::Real;
use crate::registry::{BinaryFnExpr, UnaryFnExpr};
use crate::tape::{GlobalTape, Tape};

/// Arithmetic operators for an expression type given as
/// `[generics] Type`.
macro_rules! impl_expr_ops {
    ([$($g:tt)*] $Self:ty) => {
        impl_expr_ops!(@bin [$($g)*] $Self, Add, add, AddOp);
        impl_expr_ops!(@bin [$($g)*] $Self, Sub, sub, SubOp);
        impl_expr_ops!(@bin [$($g)*] $Self, Mul, mul, MulOp);
        impl_expr_ops!(@bin [$($g)*] $Self, Div, div, DivOp);

        impl<$($g)*> Neg for $Self
        where
            Self: Expr,
        {
            type Output = UnExpr<Self, NegOp>;
            fn neg(self) -> Self::Output {
                UnExpr::new(self)
            }
        }

        impl_expr_ops!(@passive [$($g)*] $Self, f64);
        impl_expr_ops!(@passive [$($g)*] $Self, f32);
    };
    (@bin [$($g:tt)*] $Self:ty, $Trait:ident, $func:ident, $Op:ident) => {
        impl<$($g)*, Rhs> $Trait<Rhs> for $Self
        where
            Self: Expr,
            Rhs: Expr<Real = <Self as Expr>::Real, Tape = <Self as Expr>::Tape>,
        {
            type Output = BinExpr<Self, Rhs, $Op>;
            fn $func(self, rhs: Rhs) -> Self::Output {
                BinExpr::new(self, rhs)
            }
        }
    };
    (@passive [$($g:tt)*] $Self:ty, $P:ty) => {
        impl_expr_ops!(@passive_op [$($g)*] $Self, $P, Add, add, AddOp);
        impl_expr_ops!(@passive_op [$($g)*] $Self, $P, Sub, sub, SubOp);
        impl_expr_ops!(@passive_op [$($g)*] $Self, $P, Mul, mul, MulOp);
        impl_expr_ops!(@passive_op [$($g)*] $Self, $P, Div, div, DivOp);
    };
    (@passive_op [$($g:tt)*] $Self:ty, $P:ty, $Trait:ident, $func:ident, $Op:ident) => {
        impl<$($g)*> $Trait<$P> for $Self
        where
            Self: Expr<Real = $P>,
        {
            type Output = BinExpr<Self, Const<$P, <Self as Expr>::Tape>, $Op>;
            fn $func(self, rhs: $P) -> Self::Output {
                BinExpr::new(self, Const::new(rhs))
            }
        }

        impl<$($g)*> $Trait<$Self> for $P
        where
            $Self: Expr<Real = $P>,
        {
            type Output = BinExpr<Const<$P, <$Self as Expr>::Tape>, $Self, $Op>;
            fn $func(self, rhs: $Self) -> Self::Output {
                BinExpr::new(Const::new(self), rhs)
            }
        }
    };
}

impl_expr_ops!([T: Real, Tp: GlobalTape<T>] Active<T, Tp>);
impl_expr_ops!(['a, T: Real, Tp: GlobalTape<T>] &'a Active<T, Tp>);
impl_expr_ops!([T: Real, Tp: Tape<T>] Const<T, Tp>);
impl_expr_ops!([A: Expr, O] UnExpr<A, O>);
impl_expr_ops!([L: Expr, R, O] BinExpr<L, R, O>);
impl_expr_ops!([A: Expr] UnaryFnExpr<A>);
impl_expr_ops!([L: Expr, R] BinaryFnExpr<L, R>);

/// Compound assignment: the combined expression is stored into a fresh active
/// value which then takes the place of `self`; the old gradient data is
/// released when it drops.
macro_rules! impl_assign {
    ($Trait:ident, $func:ident, $Op:ident) => {
        impl<T, Tp, E> $Trait<E> for Active<T, Tp>
        where
            T: Real,
            Tp: GlobalTape<T>,
            E: Expr<Real = T, Tape = Tp>,
        {
            fn $func(&mut self, rhs: E) {
                let mut updated = Active::from_rhs(&BinExpr::<_, _, $Op>::new(&*self, rhs));
                mem::swap(self, &mut updated);
            }
        }

        impl_assign!(@passive $Trait, $func, $Op, f64);
        impl_assign!(@passive $Trait, $func, $Op, f32);
    };
    (@passive $Trait:ident, $func:ident, $Op:ident, $P:ty) => {
        impl<Tp: GlobalTape<$P>> $Trait<$P> for Active<$P, Tp> {
            fn $func(&mut self, rhs: $P) {
                let mut updated =
                    Active::from_rhs(&BinExpr::<_, _, $Op>::new(&*self, Const::<$P, Tp>::new(rhs)));
                mem::swap(self, &mut updated);
            }
        }
    };
}

impl_assign!(AddAssign, add_assign, AddOp);
impl_assign!(SubAssign, sub_assign, SubOp);
impl_assign!(MulAssign, mul_assign, MulOp);
impl_assign!(DivAssign, div_assign, DivOp);

#[cfg(test)]
mod tests {
    use crate::ops::{exp, pow, powf, sin, ExprExt};
    use crate::{RealForward, RealForwardF32};

    fn seeded(v: f64) -> RealForward {
        let mut x = RealForward::new(v);
        x.set_gradient(1.0);
        x
    }

    #[test]
    fn passive_operands_on_both_sides() {
        let x = seeded(4.0);
        let y: RealForward = (2.0 * &x - 1.0).into();
        assert_eq!(y.value(), 7.0);
        assert_eq!(y.gradient(), 2.0);

        let z: RealForward = (1.0 / &x).into();
        assert_eq!(z.value(), 0.25);
        assert_eq!(z.gradient(), -1.0 / 16.0);

        let w: RealForward = (3.0 - -&x).into();
        assert_eq!(w.value(), 7.0);
        assert_eq!(w.gradient(), 1.0);
    }

    #[test]
    fn mixed_nodes() {
        let x = seeded(2.0);
        let y = RealForward::new(5.0);
        let e = sin(&x) * &y + powf(&x, 3.0) / (&y - 1.0);
        let out: RealForward = e.into();
        let expected = 2.0f64.cos() * 5.0 + 3.0 * 4.0 / 4.0;
        assert!((out.gradient() - expected).abs() < 1e-12);
    }

    #[test]
    fn pow_with_active_exponent() {
        let mut x = RealForward::new(2.0);
        let mut p = RealForward::new(3.0);
        p.set_gradient(1.0);
        let out: RealForward = pow(&x, &p).into();
        assert_eq!(out.value(), 8.0);
        assert!((out.gradient() - 8.0 * 2.0f64.ln()).abs() < 1e-12);

        x.set_gradient(1.0);
        p.set_gradient(0.0);
        let out: RealForward = pow(&x, &p).into();
        assert_eq!(out.gradient(), 12.0);
    }

    #[test]
    fn compound_assignment() {
        let x = seeded(3.0);
        let mut acc = RealForward::new(1.0);
        acc *= &x;
        acc += x.sin();
        acc -= 0.5;
        acc /= 2.0;
        let expected_value = (3.0 + 3.0f64.sin() - 0.5) / 2.0;
        let expected_gradient = (1.0 + 3.0f64.cos()) / 2.0;
        assert!((acc.value() - expected_value).abs() < 1e-15);
        assert!((acc.gradient() - expected_gradient).abs() < 1e-15);
    }

    #[test]
    fn single_precision() {
        let mut x = RealForwardF32::new(0.5);
        x.set_gradient(1.0);
        let y: RealForwardF32 = (&x * 4.0f32 + exp(&x)).into();
        assert!((y.gradient() - (4.0 + 0.5f32.exp())).abs() < 1e-6);
    }
}
