#![allow(dead_code)]

use std::sync::Arc;

use slate_interpreter::{Body, CallTarget, Function, GuestCallSite, Interpreter};

// ---------------------------------------------------------------------------
// Program builders
// ---------------------------------------------------------------------------

/// `fib(n) = if n < 2 { n } else { fib(n - 1) + fib(n - 2) }`
pub fn define_fib(interp: &mut Interpreter) -> Arc<Function> {
    let fib = interp.function("fib");
    let mut b = interp.body(1);
    let n = b.arg(0);
    let one = b.literal(1i64);
    let two = b.literal(2i64);
    let small = b.lt(n, two);
    let n_minus_1 = b.sub(n, one);
    let n_minus_2 = b.sub(n, two);
    let left = b.call_function(&fib, [n_minus_1]);
    let right = b.call_function(&fib, [n_minus_2]);
    let sum = b.add(left, right);
    let root = b.cond(small, n, sum);
    interp.define("fib", b.finish(root))
}

/// A zero-argument function returning `value`.
pub fn define_constant(interp: &mut Interpreter, name: &str, value: i64) -> Arc<Function> {
    let mut b = interp.body(0);
    let root = b.literal(value);
    interp.define(name, b.finish(root))
}

/// `name(f, x) = f(x)`
pub fn define_apply(interp: &mut Interpreter, name: &str) -> Arc<Function> {
    let mut b = interp.body(2);
    let f = b.arg(0);
    let x = b.arg(1);
    let root = b.call(f, [x]);
    interp.define(name, b.finish(root))
}

/// `name(x) = x + delta`
pub fn define_add(interp: &mut Interpreter, name: &str, delta: i64) -> Arc<Function> {
    let mut b = interp.body(1);
    let x = b.arg(0);
    let d = b.literal(delta);
    let root = b.add(x, d);
    interp.define(name, b.finish(root))
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

pub fn body_of(function: &Function) -> Arc<Body> {
    match function.target() {
        CallTarget::Body(body) => body,
        other => panic!("{} is not a guest body: {other:?}", function.name()),
    }
}

/// The only call site of `function`'s current body.
pub fn single_site(body: &Body) -> &GuestCallSite {
    let mut sites = body.call_sites();
    let (_, site) = sites.next().expect("body has no call site");
    assert!(sites.next().is_none(), "body has more than one call site");
    site
}
