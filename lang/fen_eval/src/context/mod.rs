//! Contexts: ownership scopes and the ownership-transfer collector.
//!
//! A context owns a set of values; it is the only thing allowed to destroy
//! them, and it destroys everything it still owns when it is disposed.
//! Ownership is exclusive and moves between contexts via [`Heap::take_control`],
//! which migrates a value *and everything it can reach* in one call.
//!
//! Collection is built from the same primitive: rescue the reachable set
//! into a scratch context, purge whatever is left, move the survivors
//! back. No payload is copied and no pointer bits are traced; reachability
//! is expressed purely as ownership reassignment.

use rustc_hash::FxHashSet;

use crate::env::Environment;
use crate::heap::{Heap, ValueId};
use crate::value::ValueData;

/// Generational handle to a context record.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Context {
    pub(crate) index: u32,
    pub(crate) gen: u32,
}

/// Per-context bookkeeping.
///
/// `owned` is an insertion log, not an exact set: transferring a value away
/// leaves a stale entry behind, and purge skips entries whose slot no
/// longer records this context as owner. That makes `lose_control` O(1) at
/// the cost of re-checking at destruction time.
pub(crate) struct CtxRecord {
    pub(crate) gen: u32,
    pub(crate) alive: bool,
    pub(crate) owned: Vec<ValueId>,
    pub(crate) env: Option<ValueId>,
}

impl Heap {
    /// Create a context with a fresh environment chained to `parent_env`.
    pub fn new_context(&mut self, parent_env: Option<ValueId>) -> Context {
        let ctx = self.alloc_context();
        let env = self.alloc(ValueData::Env(Environment::new(parent_env)), Some(ctx));
        self.contexts[ctx.index as usize].env = Some(env);
        ctx
    }

    /// Create a context with no environment of its own. Only collection
    /// uses these, as the temporary home for rescued values.
    fn new_scratch_context(&mut self) -> Context {
        self.alloc_context()
    }

    fn alloc_context(&mut self) -> Context {
        if let Some(index) = self.free_contexts.pop() {
            let record = &mut self.contexts[index as usize];
            record.alive = true;
            record.owned.clear();
            record.env = None;
            return Context {
                index,
                gen: record.gen,
            };
        }
        let index = match u32::try_from(self.contexts.len()) {
            Ok(index) => index,
            Err(_) => panic!("context table exceeded u32 capacity"),
        };
        self.contexts.push(CtxRecord {
            gen: 1,
            alive: true,
            owned: Vec::new(),
            env: None,
        });
        Context { index, gen: 1 }
    }

    pub(crate) fn context_alive(&self, ctx: Context) -> bool {
        self.contexts
            .get(ctx.index as usize)
            .is_some_and(|record| record.gen == ctx.gen && record.alive)
    }

    /// The context's top-scope environment value.
    ///
    /// # Panics
    /// Panics on a disposed or scratch context.
    pub fn context_env(&self, ctx: Context) -> ValueId {
        let record = &self.contexts[ctx.index as usize];
        match (record.gen == ctx.gen && record.alive, record.env) {
            (true, Some(env)) => env,
            _ => panic!("context {ctx:?} has no environment"),
        }
    }

    /// Destroy everything the context still owns, then discard it.
    /// Returns the number of values destroyed.
    pub fn dispose_context(&mut self, ctx: Context) -> usize {
        if !self.context_alive(ctx) {
            return 0;
        }
        let destroyed = self.purge(ctx);
        let record = &mut self.contexts[ctx.index as usize];
        record.alive = false;
        record.env = None;
        record.gen = record.gen.wrapping_add(1);
        self.free_contexts.push(ctx.index);
        tracing::trace!(?ctx, destroyed, "context disposed");
        destroyed
    }

    /// Destroy every value the context still owns, newest first.
    ///
    /// Values that were transferred away are skipped via the owner check;
    /// values transferred away and back are destroyed once (the second log
    /// entry finds the slot already freed).
    pub fn purge(&mut self, ctx: Context) -> usize {
        if !self.context_alive(ctx) {
            return 0;
        }
        let owned = std::mem::take(&mut self.contexts[ctx.index as usize].owned);
        let mut destroyed = 0;
        for &id in owned.iter().rev() {
            let still_owned = self
                .slots
                .get(id.index as usize)
                .is_some_and(|slot| slot.gen == id.gen && slot.owner == Some(ctx));
            if still_owned {
                self.free_slot(id);
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Clear a value's owner without destroying it, removing it from this
    /// context's responsibility.
    pub fn lose_control(&mut self, ctx: Context, value: ValueId) {
        if let Some(slot) = self.slots.get_mut(value.index as usize) {
            if slot.gen == value.gen && slot.owner == Some(ctx) {
                slot.owner = None;
            }
        }
    }

    /// Reassign ownership of `value` — and everything reachable from it —
    /// from `from` to `to`.
    ///
    /// Silently does nothing when `from` and `to` are the same context,
    /// when either is dead, or (per reachable value) when the recorded
    /// owner is not `from`. The owner guard is what stops the walk at
    /// values that belong to somebody else, and what makes double
    /// transfers harmless.
    ///
    /// The walk is an explicit worklist with a visited set, so it
    /// terminates even if the value graph ever grows reference cycles.
    pub fn take_control(&mut self, to: Context, value: ValueId, from: Context) {
        if to == from || !self.context_alive(to) || !self.context_alive(from) {
            return;
        }

        let mut visited: FxHashSet<ValueId> = FxHashSet::default();
        let mut work = vec![value];

        while let Some(id) = work.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(slot) = self.slots.get(id.index as usize) else {
                continue;
            };
            if slot.gen != id.gen || slot.owner != Some(from) {
                continue;
            }

            match &slot.data {
                Some(ValueData::Env(env)) => {
                    work.extend(env.values());
                    if let Some(parent) = env.parent() {
                        work.push(parent);
                    }
                }
                Some(ValueData::Partial(partial)) => {
                    work.push(partial.base);
                    work.extend(partial.args.iter().copied());
                }
                Some(ValueData::Lambda(lambda)) => {
                    work.push(lambda.env);
                }
                _ => {}
            }

            self.slots[id.index as usize].owner = Some(to);
            self.contexts[to.index as usize].owned.push(id);
        }
    }

    /// Collect garbage in `ctx`: everything reachable from `keep` or from
    /// the context's own environment survives; everything else the context
    /// owns is destroyed.
    ///
    /// The caller contract is that `keep` names every live reference it
    /// still holds — anything omitted is destroyed even if referenced
    /// elsewhere.
    pub fn collect_garbage(&mut self, ctx: Context, keep: &[ValueId]) {
        if !self.context_alive(ctx) {
            return;
        }

        let scratch = self.new_scratch_context();
        for &value in keep {
            self.take_control(scratch, value, ctx);
        }
        let env = self.contexts[ctx.index as usize].env;
        if let Some(env) = env {
            self.take_control(scratch, env, ctx);
        }

        let destroyed = self.purge(ctx);

        if let Some(env) = env {
            self.take_control(ctx, env, scratch);
        }
        for &value in keep {
            self.take_control(ctx, value, scratch);
        }
        self.dispose_context(scratch);

        tracing::debug!(destroyed, roots = keep.len(), "collected garbage");
    }
}
