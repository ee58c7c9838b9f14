use super::*;
use crate::errors::EvalErrorKind;
use fen_ir::{Expr, ExprArena, ExprKind, SharedInterner, Span};
use pretty_assertions::assert_eq;

fn test_heap() -> (Heap, Context) {
    let mut heap = Heap::new(SharedInterner::new());
    let ctx = heap.new_context(None);
    (heap, ctx)
}

/// The global `+` native.
fn plus(heap: &mut Heap) -> ValueId {
    let name = heap.interner().intern("+");
    match heap.lookup_global(name) {
        Some(value) => value,
        None => panic!("global environment is missing '+'"),
    }
}

fn int_lambda(heap: &mut Heap, ctx: Context, params: usize, body: i64) -> ValueId {
    let mut arena = ExprArena::new();
    let body = arena.push(Expr::new(ExprKind::Int(body), Span::DUMMY));
    let interner = heap.interner().clone();
    let params: Vec<fen_ir::Name> = (0..params)
        .map(|i| interner.intern(&format!("p{i}")))
        .collect();
    heap.make_lambda(ctx, &params, body, SharedArena::new(arena))
}

#[test]
fn forcing_a_trivial_value_is_identity() {
    let (mut heap, ctx) = test_heap();
    let one = heap.make_int(ctx, 1);
    assert_eq!(force(&mut heap, ctx, one), Ok(one));

    let lambda = int_lambda(&mut heap, ctx, 2, 7);
    assert_eq!(force(&mut heap, ctx, lambda), Ok(lambda));
}

#[test]
fn partial_then_saturation_invokes_once() {
    // Binding + partially to 3 and then applying 4 yields 7.
    let (mut heap, ctx) = test_heap();
    let plus = plus(&mut heap);
    let three = heap.make_int(ctx, 3);
    let add3 = heap.apply(ctx, plus, &[three]);

    // Still wanting one argument: callable data, not a call.
    assert!(heap.is_trivial(add3));
    assert_eq!(heap.num_args(add3), 1);

    let four = heap.make_int(ctx, 4);
    let call = heap.apply(ctx, add3, &[four]);
    let result = match force(&mut heap, ctx, call) {
        Ok(value) => value,
        Err(e) => panic!("force failed: {e}"),
    };
    assert!(matches!(heap.get(result), Some(ValueData::Int(7))));
}

#[test]
fn under_saturation_builds_a_new_partial() {
    let (mut heap, ctx) = test_heap();
    let lambda3 = int_lambda(&mut heap, ctx, 3, 0);
    let one = heap.make_int(ctx, 1);
    let partial = heap.apply(ctx, lambda3, &[one]);

    // A partial over a partial flattens into one layer when forced.
    let nested = heap.apply(ctx, partial, &[one]);
    let flattened = match force(&mut heap, ctx, nested) {
        Ok(value) => value,
        Err(e) => panic!("force failed: {e}"),
    };
    assert_eq!(heap.num_args(flattened), 1);
    let Some(ValueData::Partial(p)) = heap.get(flattened) else {
        panic!("expected a partial application");
    };
    assert_eq!(p.args.len(), 2);
    assert_eq!(heap.owner(flattened), Some(ctx));
}

#[test]
fn zero_parameter_lambda_forces_to_its_body() {
    let (mut heap, ctx) = test_heap();
    let thunk = int_lambda(&mut heap, ctx, 0, 42);
    let result = match force(&mut heap, ctx, thunk) {
        Ok(value) => value,
        Err(e) => panic!("force failed: {e}"),
    };
    assert!(matches!(heap.get(result), Some(ValueData::Int(42))));
    // The call context is gone; the result now belongs to the caller.
    assert_eq!(heap.owner(result), Some(ctx));
}

#[test]
fn applying_a_non_function_fails() {
    let (mut heap, ctx) = test_heap();
    let one = heap.make_int(ctx, 1);
    let two = heap.make_int(ctx, 2);
    let bogus = heap.apply(ctx, one, &[two]);
    let err = match force(&mut heap, ctx, bogus) {
        Ok(_) => panic!("expected a not-applicable error"),
        Err(e) => e,
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::NotApplicable {
            value: "1".to_owned()
        }
    );
}

#[test]
fn native_arguments_are_type_checked() {
    let (mut heap, ctx) = test_heap();
    let plus = plus(&mut heap);
    let one = heap.make_int(ctx, 1);
    let t = heap.true_value();
    let call = heap.apply(ctx, plus, &[one, t]);
    let err = match force(&mut heap, ctx, call) {
        Ok(_) => panic!("expected a type error"),
        Err(e) => e,
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::WrongArgType {
            index: 2,
            function: "+".to_owned(),
            expected: TypeTag::Number,
        }
    );
}

#[test]
fn oversaturated_call_chains_keep_reducing() {
    // A zero-parameter thunk applied to arguments: the thunk's body must
    // consume them. Here the body is a plain int, so leftover arguments
    // make the chain fail as not-applicable.
    let (mut heap, ctx) = test_heap();
    let thunk = int_lambda(&mut heap, ctx, 0, 5);
    let one = heap.make_int(ctx, 1);
    let call = heap.apply(ctx, thunk, &[one]);
    let err = match force(&mut heap, ctx, call) {
        Ok(_) => panic!("expected a not-applicable error"),
        Err(e) => e,
    };
    assert!(matches!(err.kind, EvalErrorKind::NotApplicable { .. }));
}

#[test]
fn long_chains_stay_within_bounded_memory() {
    // Force a chain long enough to cross several collection intervals and
    // check the heap does not accumulate one value per step.
    let (mut heap, ctx) = test_heap();
    let plus = plus(&mut heap);

    let mut current = heap.make_int(ctx, 0);
    for _ in 0..(GC_INTERVAL * 4) {
        let one = heap.make_int(ctx, 1);
        let partial = heap.apply(ctx, plus, &[current, one]);
        current = match force(&mut heap, ctx, partial) {
            Ok(value) => value,
            Err(e) => panic!("force failed: {e}"),
        };
        // Keep the running total reachable across collections.
        heap.collect_garbage(ctx, &[current]);
    }
    assert!(matches!(
        heap.get(current),
        Some(ValueData::Int(v)) if *v == (GC_INTERVAL as i64) * 4
    ));
    assert!(heap.live_count() < 100);
}
