//! Expression evaluation.
//!
//! One exhaustive function over the closed expression sum. Every node
//! evaluates against a context; errors pick up the span of the innermost
//! node that lacked one.

use fen_ir::{Expr, ExprId, ExprKind, ExprRange, SharedArena};

use crate::apply;
use crate::errors::{undefined_variable, EvalResult};
use crate::heap::{Heap, ValueId};
use crate::value::TypeTag;
use crate::Context;

/// Evaluate an expression to a value.
pub fn eval(arena: &SharedArena, id: ExprId, heap: &mut Heap, ctx: Context) -> EvalResult {
    let Expr { kind, span } = arena.get(id);
    let result = match kind {
        ExprKind::Int(value) => Ok(heap.make_int(ctx, value)),
        ExprKind::Real(bits) => Ok(heap.make_real(ctx, f64::from_bits(bits))),
        ExprKind::Bool(value) => Ok(heap.bool_value(value)),
        ExprKind::Void => Ok(heap.void_value()),

        ExprKind::Var { name, global } => {
            let found = if global {
                heap.lookup_global(name)
            } else {
                let env = heap.context_env(ctx);
                heap.lookup(env, name)
            };
            found.ok_or_else(|| undefined_variable(heap.interner().lookup(name)))
        }

        ExprKind::Apply { base, args } => eval_apply(arena, base, args, heap, ctx),

        ExprKind::Lambda { params, body } => {
            let params = arena.names_in(params).to_vec();
            Ok(heap.make_lambda(ctx, &params, body, arena.clone()))
        }

        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond = eval(arena, cond, heap, ctx)?;
            // Value-level force: a deferred saturated call in condition
            // position still has to run before branching.
            let cond = apply::force(heap, ctx, cond)?;
            if heap.condition(cond) {
                eval(arena, then_branch, heap, ctx)
            } else {
                eval(arena, else_branch, heap, ctx)
            }
        }
    };
    result.map_err(|e| e.or_span(span))
}

/// Evaluate an application node.
///
/// When every evaluated argument is already trivial and the base is a
/// native whose arity matches exactly, the call fires eagerly in place —
/// saturated arithmetic never pays for building and unwinding a partial
/// application. Everything else defers into a partial.
fn eval_apply(
    arena: &SharedArena,
    base: ExprId,
    args: ExprRange,
    heap: &mut Heap,
    ctx: Context,
) -> EvalResult {
    let base_value = eval(arena, base, heap, ctx)?;

    let arg_ids = arena.exprs_in(args).to_vec();
    let mut values: Vec<ValueId> = Vec::with_capacity(arg_ids.len());
    let mut all_trivial = true;
    for arg in arg_ids {
        let value = eval(arena, arg, heap, ctx)?;
        if !heap.is_trivial(value) {
            all_trivial = false;
        }
        values.push(value);
    }

    if all_trivial
        && heap.is_type(base_value, TypeTag::Native)
        && heap.num_args(base_value) == values.len()
    {
        return apply::invoke(heap, ctx, base_value, &values);
    }

    Ok(heap.apply(ctx, base_value, &values))
}
