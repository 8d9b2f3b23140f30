//! Generic operation nodes.
//!
//! An elementary function is described by a marker type implementing
//! [`UnaryOp`] or [`BinaryOp`]; [`UnExpr`] and [`BinExpr`] turn any such
//! description into an expression node. The concrete catalogue lives in
//! [`ops`](crate::ops).

use std::fmt;
use std::marker::PhantomData;

use crate::expr::{Accumulator, Expr, StoreRhs};
use crate::real::Real;
use crate::tape::Tape;

/// A unary operation definition for the expression system.
pub trait UnaryOp<T: Real> {
    /// Name under which the operation is registered.
    const NAME: &'static str;
    /// Evaluates the operation.
    fn primal(x: T) -> T;
    /// Derivative with respect to the operand, given the operand `x` and the
    /// already computed `result`.
    fn derivative(x: T, result: T) -> T;
}

/// A binary operation definition for the expression system.
pub trait BinaryOp<T: Real> {
    /// Name under which the operation is registered.
    const NAME: &'static str;
    /// Evaluates the operation.
    fn primal(a: T, b: T) -> T;
    /// Jacobians with respect to `a` and `b`.
    fn jacobi(a: T, b: T, result: T) -> (Jacobi<T>, Jacobi<T>);
}

/// Local derivative of an operation with respect to one operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Jacobi<T> {
    /// Exactly one. Propagation skips the multiplication.
    One,
    /// Exactly zero. The operand is not visited at all.
    Zero,
    /// Any other value.
    Value(T),
}

impl<T: Real> Jacobi<T> {
    /// The Jacobian as a plain number.
    pub fn get(self) -> T {
        match self {
            Jacobi::One => T::one(),
            Jacobi::Zero => T::zero(),
            Jacobi::Value(j) => j,
        }
    }

    #[inline]
    pub(crate) fn propagate<E>(self, e: &E, tape: &mut E::Tape, acc: &mut Accumulator<E>)
    where
        E: Expr<Real = T>,
    {
        match self {
            Jacobi::One => e.calc_gradient(tape, acc),
            Jacobi::Zero => {}
            Jacobi::Value(j) => e.calc_gradient_scaled(tape, acc, j),
        }
    }

    #[inline]
    pub(crate) fn propagate_scaled<E>(
        self,
        e: &E,
        tape: &mut E::Tape,
        acc: &mut Accumulator<E>,
        multiplier: T,
    ) where
        E: Expr<Real = T>,
    {
        match self {
            Jacobi::One => e.calc_gradient_scaled(tape, acc, multiplier),
            Jacobi::Zero => {}
            Jacobi::Value(j) => e.calc_gradient_scaled(tape, acc, j * multiplier),
        }
    }
}

/// A unary expression over a child expression.
pub struct UnExpr<A: Expr, O> {
    a: A,
    result: A::Real,
    _op: PhantomData<O>,
}

impl<A: Expr, O: UnaryOp<A::Real>> UnExpr<A, O> {
    /// Constructs the node, evaluating the operation once.
    #[inline]
    pub fn new(a: A) -> Self {
        let result = O::primal(a.value());
        Self {
            a,
            result,
            _op: PhantomData,
        }
    }
}

impl<A: Expr, O> UnExpr<A, O> {
    /// The operand.
    pub fn operand(&self) -> &A {
        &self.a
    }
}

impl<A: Expr + Clone, O> Clone for UnExpr<A, O> {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            result: self.result,
            _op: PhantomData,
        }
    }
}

impl<A: Expr + fmt::Debug, O: UnaryOp<A::Real>> fmt::Debug for UnExpr<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) = {:?}", O::NAME, self.a, self.result)
    }
}

impl<A: Expr, O: UnaryOp<A::Real>> Expr for UnExpr<A, O> {
    type Real = A::Real;
    type Tape = A::Tape;

    #[inline]
    fn value(&self) -> A::Real {
        self.result
    }

    #[inline]
    fn calc_gradient(&self, tape: &mut A::Tape, acc: &mut Accumulator<Self>) {
        let jacobi = O::derivative(self.a.value(), self.result);
        self.a.calc_gradient_scaled(tape, acc, jacobi);
    }

    #[inline]
    fn calc_gradient_scaled(
        &self,
        tape: &mut A::Tape,
        acc: &mut Accumulator<Self>,
        multiplier: A::Real,
    ) {
        let jacobi = O::derivative(self.a.value(), self.result);
        self.a.calc_gradient_scaled(tape, acc, jacobi * multiplier);
    }
}

/// A binary expression over two child expressions.
pub struct BinExpr<L: Expr, R, O> {
    l: L,
    r: R,
    result: L::Real,
    _op: PhantomData<O>,
}

impl<L, R, O> BinExpr<L, R, O>
where
    L: Expr,
    R: Expr<Real = L::Real, Tape = L::Tape>,
    O: BinaryOp<L::Real>,
{
    /// Constructs the node, evaluating the operation once.
    #[inline]
    pub fn new(l: L, r: R) -> Self {
        let result = O::primal(l.value(), r.value());
        Self {
            l,
            r,
            result,
            _op: PhantomData,
        }
    }
}

impl<L: Expr, R, O> BinExpr<L, R, O> {
    /// The left operand.
    pub fn left(&self) -> &L {
        &self.l
    }

    /// The right operand.
    pub fn right(&self) -> &R {
        &self.r
    }
}

impl<L: Expr + Clone, R: Clone, O> Clone for BinExpr<L, R, O> {
    fn clone(&self) -> Self {
        Self {
            l: self.l.clone(),
            r: self.r.clone(),
            result: self.result,
            _op: PhantomData,
        }
    }
}

impl<L, R, O> fmt::Debug for BinExpr<L, R, O>
where
    L: Expr + fmt::Debug,
    R: fmt::Debug,
    O: BinaryOp<L::Real>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}, {:?}) = {:?}", O::NAME, self.l, self.r, self.result)
    }
}

impl<L, R, O> Expr for BinExpr<L, R, O>
where
    L: Expr,
    R: Expr<Real = L::Real, Tape = L::Tape>,
    O: BinaryOp<L::Real>,
{
    type Real = L::Real;
    type Tape = L::Tape;

    #[inline]
    fn value(&self) -> L::Real {
        self.result
    }

    #[inline]
    fn calc_gradient(&self, tape: &mut L::Tape, acc: &mut Accumulator<Self>) {
        let (jl, jr) = O::jacobi(self.l.value(), self.r.value(), self.result);
        jl.propagate(&self.l, tape, acc);
        jr.propagate(&self.r, tape, acc);
    }

    #[inline]
    fn calc_gradient_scaled(
        &self,
        tape: &mut L::Tape,
        acc: &mut Accumulator<Self>,
        multiplier: L::Real,
    ) {
        let (jl, jr) = O::jacobi(self.l.value(), self.r.value(), self.result);
        jl.propagate_scaled(&self.l, tape, acc, multiplier);
        jr.propagate_scaled(&self.r, tape, acc, multiplier);
    }
}

impl<T, Tp, A, O> StoreRhs<T, Tp> for UnExpr<A, O>
where
    T: Real,
    Tp: Tape<T>,
    A: Expr<Real = T, Tape = Tp>,
    O: UnaryOp<T>,
{
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store(value, gradient_data, self);
    }
}

impl<T, Tp, L, R, O> StoreRhs<T, Tp> for BinExpr<L, R, O>
where
    T: Real,
    Tp: Tape<T>,
    L: Expr<Real = T, Tape = Tp>,
    R: Expr<Real = T, Tape = Tp>,
    O: BinaryOp<T>,
{
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store(value, gradient_data, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{max, min, sin, sqrt, MulOp, SinOp};
    use crate::registry::lookup_unary;
    use crate::{Const, ForwardTape, RealForward};

    fn seeded(v: f64) -> RealForward {
        let mut x = RealForward::new(v);
        x.set_gradient(1.0);
        x
    }

    #[test]
    fn unselected_branch_is_not_visited() {
        let x = seeded(1.0);
        let t = seeded(0.0);
        let s: RealForward = sqrt(&t).into();
        assert!(s.gradient().is_infinite());

        let hi: RealForward = max(&x, &s).into();
        assert_eq!(hi.value(), 1.0);
        assert_eq!(hi.gradient(), 1.0);

        let lo: RealForward = min(&s, &x).into();
        assert_eq!(lo.value(), 0.0);
        assert!(lo.gradient().is_infinite());

        let lo: RealForward = (min(&x, &s) * 3.0 + 1.0).into();
        assert_eq!(lo.value(), 1.0);
        assert!(lo.gradient().is_infinite());

        let hi: RealForward = (max(&s, &x) * 3.0).into();
        assert_eq!(hi.gradient(), 3.0);
    }

    #[test]
    fn jacobi_values() {
        assert_eq!(Jacobi::<f64>::One.get(), 1.0);
        assert_eq!(Jacobi::<f64>::Zero.get(), 0.0);
        assert_eq!(Jacobi::Value(2.5f32).get(), 2.5);
    }

    #[test]
    fn nodes_expose_operands() {
        let x = seeded(0.5);
        let c = Const::<f64, ForwardTape<f64>>::new(4.0);
        assert_eq!(c.passive(), 4.0);

        let node: BinExpr<UnExpr<&RealForward, SinOp>, _, MulOp> = sin(&x) * c;
        assert_eq!(node.left().operand().value(), 0.5);
        assert_eq!(node.right().passive(), 4.0);
        assert_eq!(node.value(), 4.0 * 0.5f64.sin());

        let text = format!("{:?}", node);
        assert!(text.starts_with("mul(sin(Active(0.5, 1.0)) = "), "{}", text);
        assert!(text.contains("Const(4.0)"), "{}", text);

        let applied = lookup_unary::<f64>("cos").map(|e| e.apply(&x)).unwrap();
        assert_eq!(applied.name(), "cos");
        assert_eq!(applied.value(), 0.5f64.cos());
    }
}
