pub use crate::active::Active;
pub use crate::const_expr::Const;
pub use crate::errors::ADError;
pub use crate::expr::{Expr, StoreRhs};
pub use crate::forward::ForwardTape;
pub use crate::node::{BinExpr, BinaryOp, Jacobi, UnExpr, UnaryOp};
pub use crate::ops::*;
pub use crate::real::Real;
pub use crate::registry::{
    lookup_binary, lookup_unary, BinaryEntry, BinaryFnExpr, UnaryEntry, UnaryFnExpr,
};
pub use crate::tape::{GlobalTape, Tape};
pub use crate::{RealForward, RealForwardF32};
