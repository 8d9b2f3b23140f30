//! A tape written outside the crate, counting every event it is sent.

use std::cell::RefCell;
use std::collections::HashSet;

use codiff::ops::{sin, ExprExt};
use codiff::{Active, Expr, GlobalTape, Tape};

#[derive(Debug, Default)]
struct Slot {
    id: usize,
    tangent: f64,
}

#[derive(Clone, Debug, Default)]
struct CountingTape {
    next_id: usize,
    live: HashSet<usize>,
    inits: usize,
    destroys: usize,
    stores: usize,
    active_stores: usize,
    passive_stores: usize,
    jacobi_pushes: usize,
    scaled_pushes: usize,
    passive_pushes: usize,
}

thread_local! {
    static TAPE: RefCell<CountingTape> = RefCell::new(CountingTape::default());
}

impl CountingTape {
    fn snapshot() -> CountingTape {
        TAPE.with(|t| t.borrow().clone())
    }
}

impl Tape<f64> for CountingTape {
    type GradientData = Slot;
    type Accumulator = f64;

    fn store<E>(&mut self, lhs_value: &mut f64, lhs: &mut Slot, rhs: &E)
    where
        E: Expr<Real = f64, Tape = Self>,
    {
        self.stores += 1;
        let mut tangent = 0.0;
        rhs.calc_gradient(self, &mut tangent);
        lhs.tangent = tangent;
        *lhs_value = rhs.value();
    }

    fn store_active(&mut self, lhs_value: &mut f64, lhs: &mut Slot, rhs_value: &f64, rhs: &Slot) {
        self.active_stores += 1;
        lhs.tangent = rhs.tangent;
        *lhs_value = *rhs_value;
    }

    fn store_passive(&mut self, lhs_value: &mut f64, lhs: &mut Slot, rhs: f64) {
        self.passive_stores += 1;
        lhs.tangent = 0.0;
        *lhs_value = rhs;
    }

    fn push_passive(&mut self, _value: f64) {
        self.passive_pushes += 1;
    }

    fn push_jacobi(&mut self, acc: &mut f64, _value: &f64, gd: &Slot) {
        assert!(self.live.contains(&gd.id));
        self.jacobi_pushes += 1;
        *acc += gd.tangent;
    }

    fn push_jacobi_scaled(&mut self, acc: &mut f64, jacobi: f64, _value: &f64, gd: &Slot) {
        assert!(self.live.contains(&gd.id));
        self.scaled_pushes += 1;
        *acc += jacobi * gd.tangent;
    }

    fn init_gradient_data(&mut self, _value: &mut f64, gd: &mut Slot) {
        self.inits += 1;
        self.next_id += 1;
        gd.id = self.next_id;
        self.live.insert(gd.id);
    }

    fn destroy_gradient_data(&mut self, _value: &mut f64, gd: &mut Slot) {
        self.destroys += 1;
        assert!(self.live.remove(&gd.id), "slot {} destroyed twice", gd.id);
    }

    fn set_gradient(&mut self, gd: &mut Slot, gradient: f64) {
        gd.tangent = gradient;
    }

    fn get_gradient(&self, gd: &Slot) -> f64 {
        gd.tangent
    }

    fn gradient<'a>(&'a mut self, gd: &'a mut Slot) -> &'a mut f64 {
        &mut gd.tangent
    }
}

impl GlobalTape<f64> for CountingTape {
    fn with_tape<R>(f: impl FnOnce(&mut Self) -> R) -> R {
        TAPE.with(|t| f(&mut t.borrow_mut()))
    }
}

type Counted = Active<f64, CountingTape>;

fn seeded(v: f64) -> Counted {
    let mut x = Counted::new(v);
    x.set_gradient(1.0);
    x
}

#[test]
fn lifecycle_is_balanced() {
    {
        let x = seeded(1.0);
        let y: Counted = (&x * 2.0).into();
        let z = y.clone();
        let mut w = Counted::default();
        w.assign(&z);
        w += &x;
        w *= 3.0;
        let stats = CountingTape::snapshot();
        assert_eq!(stats.inits - stats.destroys, 4);
    }
    let stats = CountingTape::snapshot();
    assert!(stats.inits > 0);
    assert_eq!(stats.inits, stats.destroys);
    assert!(stats.live.is_empty());
}

#[test]
fn store_dispatch_follows_rhs_kind() {
    let x = seeded(0.5);
    let mut y = Counted::new(0.0);
    let before = CountingTape::snapshot();

    y.assign(&x);
    y.assign(4.0);
    y.assign(x.sin());

    let after = CountingTape::snapshot();
    assert_eq!(after.active_stores - before.active_stores, 1);
    assert_eq!(after.passive_stores - before.passive_stores, 1);
    assert_eq!(after.stores - before.stores, 1);
    assert_eq!(y.gradient(), 0.5f64.cos());
}

#[test]
fn each_leaf_is_pushed_once() {
    let x = seeded(3.0);
    let before = CountingTape::snapshot();
    let y: Counted = (sin(&x) * &x).into();
    let after = CountingTape::snapshot();

    assert_eq!(after.jacobi_pushes - before.jacobi_pushes, 0);
    assert_eq!(after.scaled_pushes - before.scaled_pushes, 2);
    assert_eq!(y.value(), 3.0 * 3.0f64.sin());
    assert!((y.gradient() - (3.0f64.sin() + 3.0 * 3.0f64.cos())).abs() < 1e-14);
}

#[test]
fn constants_reach_the_tape_as_passive() {
    let x = seeded(3.0);
    let before = CountingTape::snapshot();
    let y: Counted = (&x + 1.0).into();
    let after = CountingTape::snapshot();

    assert_eq!(after.jacobi_pushes - before.jacobi_pushes, 1);
    assert_eq!(after.passive_pushes - before.passive_pushes, 1);
    assert_eq!(y.gradient(), 1.0);
}
