//! The catalogue of elementary operations.
//!
//! Every entry is one line of declaration: a name, the primal evaluation and
//! the derivative. The generator macros turn it into the operation type, the
//! free function (`sin(x)`), the [`ExprExt`] method (`x.sin()`) and the
//! registry entry.

use num_traits::Float;

use crate::const_expr::Const;
use crate::expr::Expr;
use crate::node::{BinExpr, BinaryOp, Jacobi, UnExpr, UnaryOp};
use crate::real::Real;
use crate::registry::UnaryEntry;

/// Declares unary operations.
///
/// `|x| primal` computes the result, `|x, r| derivative` receives the operand
/// and the result so formulas such as `exp' = exp` reuse the primal.
macro_rules! unary_ops {
    (<$T:ident>
    $(
        $(#[$doc:meta])*
        $Op:ident, $func:ident, $name:literal,
        |$x:ident| $primal:expr,
        |$dx:ident, $r:ident| $deriv:expr;
    )*) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Copy, Debug)]
            pub struct $Op;

            impl<$T: Real> UnaryOp<$T> for $Op {
                const NAME: &'static str = $name;

                #[inline]
                fn primal($x: $T) -> $T {
                    $primal
                }

                #[inline]
                fn derivative($dx: $T, $r: $T) -> $T {
                    $deriv
                }
            }

            $(#[$doc])*
            #[inline]
            pub fn $func<E: Expr>(e: E) -> UnExpr<E, $Op> {
                UnExpr::new(e)
            }
        )*

        /// Method forms of the unary operations, available on every expression.
        pub trait ExprExt: Expr + Sized {
            $(
                $(#[$doc])*
                #[inline]
                fn $func(self) -> UnExpr<Self, $Op> {
                    UnExpr::new(self)
                }
            )*
        }

        impl<E: Expr> ExprExt for E {}

        pub(crate) fn unary_catalogue<$T: Real>() -> Vec<UnaryEntry<$T>> {
            vec![$(UnaryEntry::of::<$Op>()),*]
        }
    };
}

/// Declares one binary operation, optionally with a free function.
macro_rules! binary_op {
    (<$T:ident>
        $(#[$doc:meta])*
        $Op:ident, fn $func:ident, $name:literal,
        |$a:ident, $b:ident| $primal:expr,
        |$ja:ident, $jb:ident, $r:ident| $jacobi:expr
    ) => {
        binary_op!(<$T> $(#[$doc])* $Op, $name, |$a, $b| $primal, |$ja, $jb, $r| $jacobi);

        $(#[$doc])*
        #[inline]
        pub fn $func<A, B>(a: A, b: B) -> BinExpr<A, B, $Op>
        where
            A: Expr,
            B: Expr<Real = A::Real, Tape = A::Tape>,
        {
            BinExpr::new(a, b)
        }
    };
    (<$T:ident>
        $(#[$doc:meta])*
        $Op:ident, $name:literal,
        |$a:ident, $b:ident| $primal:expr,
        |$ja:ident, $jb:ident, $r:ident| $jacobi:expr
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        pub struct $Op;

        impl<$T: Real> BinaryOp<$T> for $Op {
            const NAME: &'static str = $name;

            #[inline]
            fn primal($a: $T, $b: $T) -> $T {
                $primal
            }

            #[inline]
            fn jacobi($ja: $T, $jb: $T, $r: $T) -> (Jacobi<$T>, Jacobi<$T>) {
                $jacobi
            }
        }
    };
}

/// Unary negation, reached through the `-` operator.
#[derive(Clone, Copy, Debug)]
pub struct NegOp;

impl<T: Real> UnaryOp<T> for NegOp {
    const NAME: &'static str = "neg";

    #[inline]
    fn primal(x: T) -> T {
        -x
    }

    #[inline]
    fn derivative(_x: T, _r: T) -> T {
        -T::one()
    }
}

unary_ops! {
    <T>
    /// Square root.
    SqrtOp, sqrt, "sqrt",
        |x| Float::sqrt(x),
        |_x, r| Float::recip(r + r);
    /// Exponential.
    ExpOp, exp, "exp",
        |x| Float::exp(x),
        |_x, r| r;
    /// Natural logarithm.
    LogOp, log, "log",
        |x| Float::ln(x),
        |x, _r| Float::recip(x);
    /// Base 10 logarithm.
    Log10Op, log10, "log10",
        |x| Float::log10(x),
        |x, _r| Float::recip(x * T::LN_10());
    /// Sine.
    SinOp, sin, "sin",
        |x| Float::sin(x),
        |x, _r| Float::cos(x);
    /// Cosine.
    CosOp, cos, "cos",
        |x| Float::cos(x),
        |x, _r| -Float::sin(x);
    /// Tangent.
    TanOp, tan, "tan",
        |x| Float::tan(x),
        |_x, r| T::one() + r * r;
    /// Arc sine.
    AsinOp, asin, "asin",
        |x| Float::asin(x),
        |x, _r| Float::recip(Float::sqrt(T::one() - x * x));
    /// Arc cosine.
    AcosOp, acos, "acos",
        |x| Float::acos(x),
        |x, _r| -Float::recip(Float::sqrt(T::one() - x * x));
    /// Arc tangent.
    AtanOp, atan, "atan",
        |x| Float::atan(x),
        |x, _r| Float::recip(T::one() + x * x);
    /// Hyperbolic sine.
    SinhOp, sinh, "sinh",
        |x| Float::sinh(x),
        |x, _r| Float::cosh(x);
    /// Hyperbolic cosine.
    CoshOp, cosh, "cosh",
        |x| Float::cosh(x),
        |x, _r| Float::sinh(x);
    /// Hyperbolic tangent.
    TanhOp, tanh, "tanh",
        |x| Float::tanh(x),
        |_x, r| T::one() - r * r;
    /// Inverse hyperbolic tangent.
    AtanhOp, atanh, "atanh",
        |x| Float::atanh(x),
        |x, _r| Float::recip(T::one() - x * x);
    /// Absolute value. The derivative at zero is taken as one.
    AbsOp, abs, "abs",
        |x| Float::abs(x),
        |x, _r| if x < T::zero() { -T::one() } else { T::one() };
}

binary_op!(<T>
    /// Addition.
    AddOp, "add",
    |a, b| a + b,
    |_a, _b, _r| (Jacobi::One, Jacobi::One)
);

binary_op!(<T>
    /// Subtraction.
    SubOp, "sub",
    |a, b| a - b,
    |_a, _b, _r| (Jacobi::One, Jacobi::Value(-T::one()))
);

binary_op!(<T>
    /// Multiplication.
    MulOp, "mul",
    |a, b| a * b,
    |a, b, _r| (Jacobi::Value(b), Jacobi::Value(a))
);

binary_op!(<T>
    /// Division.
    DivOp, "div",
    |a, b| a / b,
    |_a, b, r| (Jacobi::Value(Float::recip(b)), Jacobi::Value(-r / b))
);

binary_op!(<T>
    /// Raises `a` to the power `b`.
    ///
    /// The derivative with respect to the exponent is zero for a non-positive
    /// base.
    PowOp, fn pow, "pow",
    |a, b| Float::powf(a, b),
    |a, b, r| {
        let db = if a > T::zero() { r * Float::ln(a) } else { T::zero() };
        (Jacobi::Value(b * Float::powf(a, b - T::one())), Jacobi::Value(db))
    }
);

binary_op!(<T>
    /// Four quadrant arc tangent of `a / b`.
    Atan2Op, fn atan2, "atan2",
    |a, b| Float::atan2(a, b),
    |a, b, _r| {
        let d = a * a + b * b;
        (Jacobi::Value(b / d), Jacobi::Value(-a / d))
    }
);

binary_op!(<T>
    /// Minimum of two expressions. Ties go to the right operand.
    MinOp, fn min, "min",
    |a, b| Float::min(a, b),
    |a, b, _r| {
        if a < b {
            (Jacobi::One, Jacobi::Zero)
        } else {
            (Jacobi::Zero, Jacobi::One)
        }
    }
);

binary_op!(<T>
    /// Maximum of two expressions. Ties go to the right operand.
    MaxOp, fn max, "max",
    |a, b| Float::max(a, b),
    |a, b, _r| {
        if a > b {
            (Jacobi::One, Jacobi::Zero)
        } else {
            (Jacobi::Zero, Jacobi::One)
        }
    }
);

/// Raises an expression to a constant power.
#[inline]
pub fn powf<E: Expr>(
    e: E,
    p: <E::Real as Real>::Passive,
) -> BinExpr<E, Const<E::Real, E::Tape>, PowOp> {
    BinExpr::new(e, Const::new(p))
}
