#![cfg(feature = "macros")]

use codiff::{differentiable, RealForward};

#[differentiable(diff_example)]
fn example(a: f64, #[diffvar] x: f64) -> f64 {
    x + a
}

#[differentiable(diff_literal_left)]
fn literal_left(#[diffvar] x: f64) -> f64 {
    2.0 + x
}

#[differentiable(diff_product)]
fn product(#[diffvar] x: f64, #[diffvar] y: f64) -> f64 {
    x * y + x.sin()
}

#[differentiable(diff_early_return)]
fn early_return(#[diffvar] x: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        return x * 0.0;
    }
    x * scale
}

fn seeded(v: f64) -> RealForward {
    let mut x = RealForward::new(v);
    x.set_gradient(1.0);
    x
}

#[test]
fn macro_keeps_original_function() {
    assert_eq!(example(1.0, 2.0), 3.0);
    assert_eq!(literal_left(1.5), 3.5);
    assert_eq!(product(2.0, 3.0), 6.0 + 2.0f64.sin());
}

#[test]
fn macro_generates_function_companion() {
    let x = seeded(2.0);
    let result = diff_example(1.0, &x);
    assert_eq!(result.value(), 3.0);
    assert_eq!(result.gradient(), 1.0);
}

#[test]
fn macro_handles_literal_on_the_left() {
    let x = seeded(2.0);
    let result = diff_literal_left(&x);
    assert_eq!(result.value(), 4.0);
    assert_eq!(result.gradient(), 1.0);
}

#[test]
fn macro_companion_matches_original() {
    let x = seeded(2.0);
    let y = RealForward::new(3.0);
    let result = diff_product(&x, &y);
    assert_eq!(result.value(), product(2.0, 3.0));
    assert!((result.gradient() - (3.0 + 2.0f64.cos())).abs() < 1e-15);

    let result = diff_early_return(&x, 0.5);
    assert_eq!(result.value(), early_return(2.0, 0.5));
    assert_eq!(result.gradient(), 0.5);

    let result = diff_early_return(&x, 0.0);
    assert_eq!(result.value(), 0.0);
    assert_eq!(result.gradient(), 0.0);
}
