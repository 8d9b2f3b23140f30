//! Name → (primal, derivative) tables for the generated operations.
//!
//! The tables are built from the same declarations as the operation types, so
//! looking an entry up by name and applying it gives exactly the node the
//! typed free function would have built.

use std::fmt;

use crate::errors::{ADError, Result};
use crate::expr::{Accumulator, Expr, StoreRhs};
use crate::node::{BinaryOp, Jacobi, UnaryOp};
use crate::ops::{self, AddOp, Atan2Op, DivOp, MaxOp, MinOp, MulOp, NegOp, PowOp, SubOp};
use crate::real::Real;
use crate::tape::Tape;

/// A registered unary operation.
pub struct UnaryEntry<T> {
    pub name: &'static str,
    pub primal: fn(T) -> T,
    /// Derivative given the operand and the primal result.
    pub derivative: fn(T, T) -> T,
}

/// A registered binary operation.
pub struct BinaryEntry<T> {
    pub name: &'static str,
    pub primal: fn(T, T) -> T,
    /// Jacobians given both operands and the primal result.
    pub jacobi: fn(T, T, T) -> (Jacobi<T>, Jacobi<T>),
}

impl<T> Clone for UnaryEntry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UnaryEntry<T> {}

impl<T> Clone for BinaryEntry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BinaryEntry<T> {}

impl<T> fmt::Debug for UnaryEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnaryEntry({})", self.name)
    }
}

impl<T> fmt::Debug for BinaryEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryEntry({})", self.name)
    }
}

impl<T: Real> UnaryEntry<T> {
    /// The entry describing `O`.
    pub fn of<O: UnaryOp<T>>() -> Self {
        Self {
            name: O::NAME,
            primal: O::primal,
            derivative: O::derivative,
        }
    }

    /// Builds a node applying this operation to `e`.
    pub fn apply<E: Expr<Real = T>>(&self, e: E) -> UnaryFnExpr<E> {
        UnaryFnExpr::new(*self, e)
    }
}

impl<T: Real> BinaryEntry<T> {
    /// The entry describing `O`.
    pub fn of<O: BinaryOp<T>>() -> Self {
        Self {
            name: O::NAME,
            primal: O::primal,
            jacobi: O::jacobi,
        }
    }

    /// Builds a node applying this operation to `l` and `r`.
    pub fn apply<L, R>(&self, l: L, r: R) -> BinaryFnExpr<L, R>
    where
        L: Expr<Real = T>,
        R: Expr<Real = T, Tape = L::Tape>,
    {
        BinaryFnExpr::new(*self, l, r)
    }
}

/// All unary operations, negation first.
pub fn unary_entries<T: Real>() -> Vec<UnaryEntry<T>> {
    let mut entries = vec![UnaryEntry::of::<NegOp>()];
    entries.extend(ops::unary_catalogue());
    entries
}

/// All binary operations, arithmetic first.
pub fn binary_entries<T: Real>() -> Vec<BinaryEntry<T>> {
    vec![
        BinaryEntry::of::<AddOp>(),
        BinaryEntry::of::<SubOp>(),
        BinaryEntry::of::<MulOp>(),
        BinaryEntry::of::<DivOp>(),
        BinaryEntry::of::<PowOp>(),
        BinaryEntry::of::<Atan2Op>(),
        BinaryEntry::of::<MinOp>(),
        BinaryEntry::of::<MaxOp>(),
    ]
}

/// Finds a unary operation by name.
pub fn lookup_unary<T: Real>(name: &str) -> Result<UnaryEntry<T>> {
    if let Some(entry) = unary_entries().into_iter().find(|e| e.name == name) {
        return Ok(entry);
    }
    if binary_entries::<T>().iter().any(|e| e.name == name) {
        return Err(ADError::ArityMismatch {
            name: name.to_string(),
            expected: 1,
            found: 2,
        });
    }
    Err(ADError::UnknownOperation(name.to_string()))
}

/// Finds a binary operation by name.
pub fn lookup_binary<T: Real>(name: &str) -> Result<BinaryEntry<T>> {
    if let Some(entry) = binary_entries().into_iter().find(|e| e.name == name) {
        return Ok(entry);
    }
    if unary_entries::<T>().iter().any(|e| e.name == name) {
        return Err(ADError::ArityMismatch {
            name: name.to_string(),
            expected: 2,
            found: 1,
        });
    }
    Err(ADError::UnknownOperation(name.to_string()))
}

/// A unary node whose operation is picked at run time from the registry.
pub struct UnaryFnExpr<A: Expr> {
    a: A,
    entry: UnaryEntry<A::Real>,
    result: A::Real,
}

impl<A: Expr> UnaryFnExpr<A> {
    /// Constructs the node, evaluating the operation once.
    pub fn new(entry: UnaryEntry<A::Real>, a: A) -> Self {
        let result = (entry.primal)(a.value());
        Self { a, entry, result }
    }

    pub fn name(&self) -> &'static str {
        self.entry.name
    }
}

impl<A: Expr + Clone> Clone for UnaryFnExpr<A> {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            entry: self.entry,
            result: self.result,
        }
    }
}

impl<A: Expr + fmt::Debug> fmt::Debug for UnaryFnExpr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) = {:?}", self.entry.name, self.a, self.result)
    }
}

impl<A: Expr> Expr for UnaryFnExpr<A> {
    type Real = A::Real;
    type Tape = A::Tape;

    #[inline]
    fn value(&self) -> A::Real {
        self.result
    }

    fn calc_gradient(&self, tape: &mut A::Tape, acc: &mut Accumulator<Self>) {
        let jacobi = (self.entry.derivative)(self.a.value(), self.result);
        self.a.calc_gradient_scaled(tape, acc, jacobi);
    }

    fn calc_gradient_scaled(
        &self,
        tape: &mut A::Tape,
        acc: &mut Accumulator<Self>,
        multiplier: A::Real,
    ) {
        let jacobi = (self.entry.derivative)(self.a.value(), self.result);
        self.a.calc_gradient_scaled(tape, acc, jacobi * multiplier);
    }
}

impl<T, Tp, A> StoreRhs<T, Tp> for UnaryFnExpr<A>
where
    T: Real,
    Tp: Tape<T>,
    A: Expr<Real = T, Tape = Tp>,
{
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store(value, gradient_data, self);
    }
}

/// A binary node whose operation is picked at run time from the registry.
pub struct BinaryFnExpr<L: Expr, R> {
    l: L,
    r: R,
    entry: BinaryEntry<L::Real>,
    result: L::Real,
}

impl<L, R> BinaryFnExpr<L, R>
where
    L: Expr,
    R: Expr<Real = L::Real, Tape = L::Tape>,
{
    /// Constructs the node, evaluating the operation once.
    pub fn new(entry: BinaryEntry<L::Real>, l: L, r: R) -> Self {
        let result = (entry.primal)(l.value(), r.value());
        Self {
            l,
            r,
            entry,
            result,
        }
    }
}

impl<L: Expr, R> BinaryFnExpr<L, R> {
    pub fn name(&self) -> &'static str {
        self.entry.name
    }
}

impl<L: Expr + Clone, R: Clone> Clone for BinaryFnExpr<L, R> {
    fn clone(&self) -> Self {
        Self {
            l: self.l.clone(),
            r: self.r.clone(),
            entry: self.entry,
            result: self.result,
        }
    }
}

impl<L: Expr + fmt::Debug, R: fmt::Debug> fmt::Debug for BinaryFnExpr<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}, {:?}) = {:?}", self.entry.name, self.l, self.r, self.result)
    }
}

impl<L, R> Expr for BinaryFnExpr<L, R>
where
    L: Expr,
    R: Expr<Real = L::Real, Tape = L::Tape>,
{
    type Real = L::Real;
    type Tape = L::Tape;

    #[inline]
    fn value(&self) -> L::Real {
        self.result
    }

    fn calc_gradient(&self, tape: &mut L::Tape, acc: &mut Accumulator<Self>) {
        let (jl, jr) = (self.entry.jacobi)(self.l.value(), self.r.value(), self.result);
        jl.propagate(&self.l, tape, acc);
        jr.propagate(&self.r, tape, acc);
    }

    fn calc_gradient_scaled(
        &self,
        tape: &mut L::Tape,
        acc: &mut Accumulator<Self>,
        multiplier: L::Real,
    ) {
        let (jl, jr) = (self.entry.jacobi)(self.l.value(), self.r.value(), self.result);
        jl.propagate_scaled(&self.l, tape, acc, multiplier);
        jr.propagate_scaled(&self.r, tape, acc, multiplier);
    }
}

impl<T, Tp, L, R> StoreRhs<T, Tp> for BinaryFnExpr<L, R>
where
    T: Real,
    Tp: Tape<T>,
    L: Expr<Real = T, Tape = Tp>,
    R: Expr<Real = T, Tape = Tp>,
{
    fn store_into(&self, tape: &mut Tp, value: &mut T, gradient_data: &mut Tp::GradientData) {
        tape.store(value, gradient_data, self);
    }
}
