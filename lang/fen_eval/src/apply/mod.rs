//! Value forcing and the currying trampoline.
//!
//! Forcing a value runs it to normal form. Trivial values (anything that
//! is not a saturated function) force to themselves; saturated ones enter
//! [`partial_eval`], an iterative loop that unwinds arbitrarily deep
//! chains of partial applications without growing the call stack, and
//! that interleaves garbage collection into long call chains so peak
//! memory stays bounded.

use std::collections::VecDeque;

use fen_ir::{ExprId, Name, SharedArena};

use crate::errors::{not_applicable, EvalResult};
use crate::exec;
use crate::heap::{Heap, ValueId};
use crate::value::{NativeHandler, TypeTag, ValueData};
use crate::Context;

/// Trampoline iterations between proactive garbage collections.
pub const GC_INTERVAL: usize = 256;

/// Force a value to normal form. A no-op for trivial values.
pub fn force(heap: &mut Heap, ctx: Context, value: ValueId) -> EvalResult {
    if heap.is_trivial(value) {
        Ok(value)
    } else {
        partial_eval(heap, ctx, value)
    }
}

/// One trampoline step, decided while the heap is only borrowed.
enum Step {
    /// Current base is a partial: splice its captured arguments onto the
    /// front of the buffer and descend into its base.
    Flatten { base: ValueId, args: Box<[ValueId]> },
    /// Current base is directly callable with this arity.
    Callable { arity: usize },
    /// Current base is not callable at all.
    Bottom,
}

/// The currying trampoline.
///
/// Iteratively flattens nested partial applications into one front-growable
/// argument buffer and a final callee. When the buffer saturates the
/// callee's arity, the call fires and its result becomes the new base;
/// when it falls short, the remainder is packaged into a new partial
/// application; a non-callable base succeeds only with an empty buffer.
///
/// Every [`GC_INTERVAL`] iterations the evaluating context is collected,
/// rooted at the buffer contents plus the current base.
pub fn partial_eval(heap: &mut Heap, ctx: Context, start: ValueId) -> EvalResult {
    let mut buffer: VecDeque<ValueId> = VecDeque::new();
    let mut base = start;
    let mut gc_timer = 0usize;

    loop {
        let step = match heap.data(base) {
            ValueData::Partial(partial) => Step::Flatten {
                base: partial.base,
                args: partial.args.clone(),
            },
            ValueData::Native(_) | ValueData::Lambda(_) => Step::Callable {
                arity: heap.num_args(base),
            },
            _ => Step::Bottom,
        };

        match step {
            Step::Flatten { base: inner, args } => {
                for &arg in args.iter().rev() {
                    buffer.push_front(arg);
                }
                base = inner;
            }
            Step::Callable { arity } => {
                if buffer.len() < arity {
                    let remainder: Vec<ValueId> = buffer.iter().copied().collect();
                    return Ok(heap.apply(ctx, base, &remainder));
                }
                let call_args: Vec<ValueId> = buffer.iter().take(arity).copied().collect();
                let result = invoke(heap, ctx, base, &call_args)?;
                buffer.drain(..arity);
                base = result;
            }
            Step::Bottom => {
                if buffer.is_empty() {
                    return Ok(base);
                }
                return Err(not_applicable(heap.display(base)));
            }
        }

        gc_timer += 1;
        if gc_timer > GC_INTERVAL {
            gc_timer = 0;
            let mut keep: Vec<ValueId> = buffer.iter().copied().collect();
            keep.push(base);
            heap.collect_garbage(ctx, &keep);
        }
    }
}

/// What `invoke` found at the callee, copied out so the heap can be
/// borrowed mutably while the call runs.
enum Callee {
    Native {
        name: Name,
        params: Box<[TypeTag]>,
        handler: NativeHandler,
    },
    Lambda {
        params: Box<[Name]>,
        body: ExprId,
        arena: SharedArena,
        env: ValueId,
    },
    NotCallable,
}

/// Call a function value with exactly `num_args` arguments.
///
/// Natives force each argument and validate it against the declared
/// per-parameter constraint before the handler runs. Lambdas run their
/// body in a fresh child context chained to the captured environment and
/// transfer ownership of the result into the calling context before the
/// child is destroyed — without that transfer the result would die with
/// the call scope.
pub(crate) fn invoke(
    heap: &mut Heap,
    ctx: Context,
    func: ValueId,
    args: &[ValueId],
) -> EvalResult {
    let callee = match heap.data(func) {
        ValueData::Native(native) => Callee::Native {
            name: native.name,
            params: native.params.clone(),
            handler: native.handler,
        },
        ValueData::Lambda(lambda) => Callee::Lambda {
            params: lambda.params.clone(),
            body: lambda.body,
            arena: lambda.arena.clone(),
            env: lambda.env,
        },
        _ => Callee::NotCallable,
    };

    match callee {
        Callee::Native {
            name,
            params,
            handler,
        } => {
            let mut forced = Vec::with_capacity(params.len());
            for (index, (&arg, &expected)) in args.iter().zip(params.iter()).enumerate() {
                let value = force(heap, ctx, arg)?;
                if !heap.is_type(value, expected) {
                    let function = heap.interner().lookup(name);
                    return Err(crate::errors::wrong_arg_type(index + 1, function, expected));
                }
                forced.push(value);
            }
            handler(heap, ctx, &forced)
        }
        Callee::Lambda {
            params,
            body,
            arena,
            env,
        } => {
            let child = heap.new_context(Some(env));
            let child_env = heap.context_env(child);
            for (&param, &arg) in params.iter().zip(args.iter()) {
                let _ = heap.env_add(child_env, param, arg);
            }
            let result = exec::eval(&arena, body, heap, child);
            let result = match result {
                Ok(value) => {
                    heap.take_control(ctx, value, child);
                    Ok(value)
                }
                Err(error) => Err(error),
            };
            heap.dispose_context(child);
            result
        }
        Callee::NotCallable => Err(not_applicable(heap.display(func))),
    }
}

#[cfg(test)]
mod tests;
