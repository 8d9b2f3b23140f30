//! Floating point types usable as primal values.

use std::fmt;
use std::ops::AddAssign;

use num_traits::{Float, FloatConst, Zero};

/// A floating point type carried by expressions and active values.
///
/// `Passive` is the non-differentiable counterpart used for constants. For the
/// plain float types both coincide.
pub trait Real:
    Float + FloatConst + AddAssign + Default + fmt::Debug + fmt::Display + 'static
{
    /// The constant type that can be assigned without derivative information.
    type Passive: Copy + Zero + fmt::Debug;

    /// Lifts a passive constant into the primal type.
    fn from_passive(p: Self::Passive) -> Self;
}

impl Real for f64 {
    type Passive = f64;

    #[inline]
    fn from_passive(p: f64) -> Self {
        p
    }
}

impl Real for f32 {
    type Passive = f32;

    #[inline]
    fn from_passive(p: f32) -> Self {
        p
    }
}
