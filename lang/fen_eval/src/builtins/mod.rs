//! The built-in global operators.
//!
//! Installed into the global environment on its first access:
//! `+ - * /` over numbers (Int op Int stays Int, anything mixed promotes
//! to Real, division is always Real), the comparisons, and `==`/`!=` over
//! anything.

use crate::errors::{division_by_zero, EvalResult};
use crate::heap::{Heap, ValueId};
use crate::value::{NativeHandler, TypeTag, ValueData};
use crate::Context;

/// Install every builtin into `env`, owned by `ctx`.
pub fn install(heap: &mut Heap, ctx: Context, env: ValueId) {
    use TypeTag::{Any, Number};

    add_proc(heap, ctx, env, "+", &[Number, Number], proc_add);
    add_proc(heap, ctx, env, "-", &[Number, Number], proc_sub);
    add_proc(heap, ctx, env, "*", &[Number, Number], proc_mul);
    add_proc(heap, ctx, env, "/", &[Number, Number], proc_div);
    add_proc(heap, ctx, env, ">", &[Number, Number], proc_gt);
    add_proc(heap, ctx, env, "<", &[Number, Number], proc_lt);
    add_proc(heap, ctx, env, ">=", &[Number, Number], proc_ge);
    add_proc(heap, ctx, env, "<=", &[Number, Number], proc_le);
    add_proc(heap, ctx, env, "==", &[Any, Any], proc_eq);
    add_proc(heap, ctx, env, "!=", &[Any, Any], proc_ne);
}

fn add_proc(
    heap: &mut Heap,
    ctx: Context,
    env: ValueId,
    name: &str,
    params: &[TypeTag],
    handler: NativeHandler,
) {
    let func = heap.make_native(ctx, name, params, handler);
    let name = heap.interner().intern(name);
    let _ = heap.env_add(env, name, func);
}

/// Both arguments as `i64`, when both are `Int`.
fn both_ints(heap: &Heap, a: ValueId, b: ValueId) -> Option<(i64, i64)> {
    match (heap.data(a), heap.data(b)) {
        (ValueData::Int(a), ValueData::Int(b)) => Some((*a, *b)),
        _ => None,
    }
}

fn proc_add(heap: &mut Heap, ctx: Context, args: &[ValueId]) -> EvalResult {
    match both_ints(heap, args[0], args[1]) {
        Some((a, b)) => Ok(heap.make_int(ctx, a.wrapping_add(b))),
        None => {
            let result = heap.number_value(args[0]) + heap.number_value(args[1]);
            Ok(heap.make_real(ctx, result))
        }
    }
}

fn proc_sub(heap: &mut Heap, ctx: Context, args: &[ValueId]) -> EvalResult {
    match both_ints(heap, args[0], args[1]) {
        Some((a, b)) => Ok(heap.make_int(ctx, a.wrapping_sub(b))),
        None => {
            let result = heap.number_value(args[0]) - heap.number_value(args[1]);
            Ok(heap.make_real(ctx, result))
        }
    }
}

fn proc_mul(heap: &mut Heap, ctx: Context, args: &[ValueId]) -> EvalResult {
    match both_ints(heap, args[0], args[1]) {
        Some((a, b)) => Ok(heap.make_int(ctx, a.wrapping_mul(b))),
        None => {
            let result = heap.number_value(args[0]) * heap.number_value(args[1]);
            Ok(heap.make_real(ctx, result))
        }
    }
}

/// Division is always Real, even for exact integer operands, and a zero
/// divisor of either type fails before the division happens.
fn proc_div(heap: &mut Heap, ctx: Context, args: &[ValueId]) -> EvalResult {
    let divisor = heap.number_value(args[1]);
    if divisor == 0.0 {
        return Err(division_by_zero());
    }
    let result = heap.number_value(args[0]) / divisor;
    Ok(heap.make_real(ctx, result))
}

/// Three-way comparison: 0 equal, 1 greater (or just "not equal"), -1 less.
///
/// Numbers compare by numeric value across Int/Real. Mismatched types are
/// never equal. Voids are all equal. Functions and environments compare by
/// identity.
fn compare(heap: &Heap, a: ValueId, b: ValueId) -> i32 {
    let number = TypeTag::Number;
    if heap.is_type(a, number) && heap.is_type(b, number) {
        let left = heap.number_value(a);
        let right = heap.number_value(b);
        if left == right {
            return 0;
        }
        return if left > right { 1 } else { -1 };
    }
    if heap.type_tag(a) != heap.type_tag(b) {
        return 1;
    }
    match (heap.data(a), heap.data(b)) {
        (ValueData::Bool(a), ValueData::Bool(b)) => i32::from(a != b),
        (ValueData::Void, ValueData::Void) => 0,
        _ => i32::from(a != b),
    }
}

fn proc_eq(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let equal = compare(heap, args[0], args[1]) == 0;
    Ok(heap.bool_value(equal))
}

fn proc_ne(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let unequal = compare(heap, args[0], args[1]) != 0;
    Ok(heap.bool_value(unequal))
}

fn proc_gt(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let result = compare(heap, args[0], args[1]) > 0;
    Ok(heap.bool_value(result))
}

fn proc_lt(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let result = compare(heap, args[0], args[1]) < 0;
    Ok(heap.bool_value(result))
}

fn proc_ge(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let result = compare(heap, args[0], args[1]) >= 0;
    Ok(heap.bool_value(result))
}

fn proc_le(heap: &mut Heap, _ctx: Context, args: &[ValueId]) -> EvalResult {
    let result = compare(heap, args[0], args[1]) <= 0;
    Ok(heap.bool_value(result))
}
