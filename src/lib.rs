//! Operator-overloading automatic differentiation with expression templates.
//!
//! Arithmetic on [`Active`] values builds a statically typed expression tree
//! that is evaluated once at construction and collapsed when it is assigned
//! back into an active value. The differentiation mode is a type parameter:
//! the active value reports every lifecycle event and every stored expression
//! to a [`Tape`]. [`ForwardTape`] computes tangents right away.

pub mod active;
pub mod const_expr;
pub mod errors;
pub mod expr;
pub mod forward;
pub mod node;
pub mod ops;
pub mod prelude;
pub mod real;
pub mod registry;
pub mod tape;
mod overloads;

pub use active::Active;
pub use const_expr::Const;
pub use errors::{ADError, Result};
pub use expr::{Expr, StoreRhs};
pub use forward::ForwardTape;
pub use real::Real;
pub use tape::{GlobalTape, Tape};

#[cfg(feature = "macros")]
pub use codiff_macros::differentiable;

/// Double precision forward-mode active type.
pub type RealForward = Active<f64, ForwardTape<f64>>;

/// Single precision forward-mode active type.
pub type RealForwardF32 = Active<f32, ForwardTape<f32>>;
