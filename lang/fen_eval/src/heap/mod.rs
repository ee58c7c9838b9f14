//! The value heap: a slab arena with generational handles.
//!
//! Every runtime value lives in a [`Slot`]; a [`ValueId`] is a slot index
//! plus the slot's generation at allocation time, so a handle to a freed
//! (and possibly reused) slot is detectable instead of dangling.
//!
//! Allocation scans the slab left-to-right from a moving low-water mark:
//! freeing a slot lowers the mark, so repeated allocate/free cycles stay
//! near-amortized O(1) without a separate free list. The slab grows in
//! fixed-size chunks when full. This is purely an allocation strategy; the
//! observable value semantics would be identical on a general-purpose
//! allocator.
//!
//! The heap also owns the canonical singletons (`true`, `false`, void),
//! the global environment and the global-reference lookup cache, each
//! lazily initialized exactly once on first access.

use fen_ir::{ExprId, Name, SharedArena, SharedInterner};
use rustc_hash::FxHashMap;

use crate::builtins;
use crate::context::{Context, CtxRecord};
use crate::value::{
    LambdaFunction, NativeFunction, NativeHandler, PartialApplication, TypeTag, ValueData,
};

/// Slab growth increment, in slots.
const SLAB_CHUNK: usize = 128;

/// Generational handle to a heap slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ValueId {
    pub(crate) index: u32,
    pub(crate) gen: u32,
}

/// A heap slot. `data == None` means free. The generation is bumped every
/// time the slot is freed, which invalidates outstanding handles.
pub(crate) struct Slot {
    pub(crate) gen: u32,
    pub(crate) owner: Option<Context>,
    pub(crate) data: Option<ValueData>,
}

impl Slot {
    fn free() -> Self {
        Slot {
            gen: 1,
            owner: None,
            data: None,
        }
    }
}

/// Lazily-created canonical singletons. Unowned, never destroyed.
struct Singletons {
    true_value: ValueId,
    false_value: ValueId,
    void_value: ValueId,
}

/// The global scope, created and populated with builtins exactly once.
struct GlobalScope {
    env: ValueId,
}

/// The value heap. See the module docs.
pub struct Heap {
    pub(crate) slots: Vec<Slot>,
    /// No free slot exists below this index.
    low_water: usize,
    live: usize,
    total_allocated: u64,
    pub(crate) contexts: Vec<CtxRecord>,
    pub(crate) free_contexts: Vec<u32>,
    interner: SharedInterner,
    singletons: Option<Singletons>,
    global: Option<GlobalScope>,
    global_cache: FxHashMap<Name, ValueId>,
}

fn to_u32(value: usize, what: &str) -> u32 {
    match u32::try_from(value) {
        Ok(v) => v,
        Err(_) => panic!("{what} exceeded u32 capacity"),
    }
}

impl Heap {
    /// Create an empty heap.
    pub fn new(interner: SharedInterner) -> Self {
        Heap {
            slots: Vec::new(),
            low_water: 0,
            live: 0,
            total_allocated: 0,
            contexts: Vec::new(),
            free_contexts: Vec::new(),
            interner,
            singletons: None,
            global: None,
            global_cache: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Number of live (allocated) values, singletons included.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Running count of every allocation ever made.
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated
    }

    /// Whether a handle still refers to a live value.
    pub fn is_live(&self, id: ValueId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.gen == id.gen && slot.data.is_some())
    }

    /// The recorded owner of a value, if it is owned at all.
    pub fn owner(&self, id: ValueId) -> Option<Context> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.gen == id.gen && slot.data.is_some())
            .and_then(|slot| slot.owner)
    }

    /// Payload of a live value.
    pub fn get(&self, id: ValueId) -> Option<&ValueData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.gen == id.gen)
            .and_then(|slot| slot.data.as_ref())
    }

    /// Payload of a live value.
    ///
    /// # Panics
    /// Panics on a stale handle. Internal call sites hold handles they know
    /// are live; external callers can use [`Heap::get`].
    pub(crate) fn data(&self, id: ValueId) -> &ValueData {
        match self.get(id) {
            Some(data) => data,
            None => panic!("stale value handle {id:?}"),
        }
    }

    pub(crate) fn data_mut(&mut self, id: ValueId) -> &mut ValueData {
        let slot = &mut self.slots[id.index as usize];
        match (slot.gen == id.gen, slot.data.as_mut()) {
            (true, Some(data)) => data,
            _ => panic!("stale value handle {id:?}"),
        }
    }

    /// Allocate a slot: left-to-right scan from the low-water mark, growing
    /// the slab by a chunk when every slot is occupied.
    pub(crate) fn alloc(&mut self, data: ValueData, owner: Option<Context>) -> ValueId {
        let mut index = self.low_water;
        while index < self.slots.len() && self.slots[index].data.is_some() {
            index += 1;
        }
        if index == self.slots.len() {
            self.slots
                .resize_with(self.slots.len() + SLAB_CHUNK, Slot::free);
        }
        self.low_water = index + 1;

        let slot = &mut self.slots[index];
        slot.data = Some(data);
        slot.owner = owner;
        let id = ValueId {
            index: to_u32(index, "value heap"),
            gen: slot.gen,
        };

        self.live += 1;
        self.total_allocated += 1;
        if let Some(ctx) = owner {
            self.contexts[ctx.index as usize].owned.push(id);
        }
        id
    }

    /// Free a slot, bumping its generation and lowering the low-water mark.
    pub(crate) fn free_slot(&mut self, id: ValueId) {
        let index = id.index as usize;
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.gen != id.gen || slot.data.is_none() {
            return;
        }
        slot.data = None;
        slot.owner = None;
        slot.gen = slot.gen.wrapping_add(1);
        self.live -= 1;
        if index < self.low_water {
            self.low_water = index;
        }
    }

    // Value constructors

    pub fn make_int(&mut self, ctx: Context, value: i64) -> ValueId {
        self.alloc(ValueData::Int(value), Some(ctx))
    }

    pub fn make_real(&mut self, ctx: Context, value: f64) -> ValueId {
        self.alloc(ValueData::Real(value), Some(ctx))
    }

    /// Create a native function value.
    pub fn make_native(
        &mut self,
        ctx: Context,
        name: &str,
        params: &[TypeTag],
        handler: NativeHandler,
    ) -> ValueId {
        let name = self.interner.intern(name);
        self.alloc(
            ValueData::Native(NativeFunction {
                name,
                params: params.into(),
                handler,
            }),
            Some(ctx),
        )
    }

    /// Create a lambda value capturing the context's current environment.
    pub fn make_lambda(
        &mut self,
        ctx: Context,
        params: &[Name],
        body: ExprId,
        arena: SharedArena,
    ) -> ValueId {
        let env = self.context_env(ctx);
        self.alloc(
            ValueData::Lambda(LambdaFunction {
                params: params.into(),
                body,
                arena,
                env,
            }),
            Some(ctx),
        )
    }

    /// Build a partial application of `func` to `args`. With no arguments
    /// this is just `func`.
    pub fn apply(&mut self, ctx: Context, func: ValueId, args: &[ValueId]) -> ValueId {
        if args.is_empty() {
            return func;
        }
        self.alloc(
            ValueData::Partial(PartialApplication {
                base: func,
                args: args.into(),
            }),
            Some(ctx),
        )
    }

    // Canonical singletons

    fn singletons(&mut self) -> &Singletons {
        if self.singletons.is_none() {
            let true_value = self.alloc(ValueData::Bool(true), None);
            let false_value = self.alloc(ValueData::Bool(false), None);
            let void_value = self.alloc(ValueData::Void, None);
            self.singletons = Some(Singletons {
                true_value,
                false_value,
                void_value,
            });
        }
        match &self.singletons {
            Some(singletons) => singletons,
            None => unreachable!("singletons initialized above"),
        }
    }

    pub fn true_value(&mut self) -> ValueId {
        self.singletons().true_value
    }

    pub fn false_value(&mut self) -> ValueId {
        self.singletons().false_value
    }

    pub fn void_value(&mut self) -> ValueId {
        self.singletons().void_value
    }

    pub fn bool_value(&mut self, value: bool) -> ValueId {
        if value {
            self.true_value()
        } else {
            self.false_value()
        }
    }

    // The global environment

    /// The global environment value, created and populated with the
    /// builtins on first access.
    pub fn global_env(&mut self) -> ValueId {
        if let Some(global) = &self.global {
            return global.env;
        }
        let ctx = self.new_context(None);
        let env = self.context_env(ctx);
        self.global = Some(GlobalScope { env });
        builtins::install(self, ctx, env);
        tracing::debug!(bindings = self.env_len(env), "global environment populated");
        env
    }

    /// Resolve a name directly in the global environment, memoizing hits.
    /// Safe because the global environment is populated once and never
    /// mutated afterwards.
    pub fn lookup_global(&mut self, name: Name) -> Option<ValueId> {
        if let Some(&hit) = self.global_cache.get(&name) {
            return Some(hit);
        }
        let env = self.global_env();
        let found = self.env_get_local(env, name);
        if let Some(value) = found {
            self.global_cache.insert(name, value);
        }
        found
    }

    /// Resolve a name starting from an environment: local bindings first,
    /// then the parent chain, then (only from a chain that does not end in
    /// the global environment itself) the global environment.
    pub fn lookup(&mut self, env: ValueId, name: Name) -> Option<ValueId> {
        let mut current = env;
        loop {
            let (hit, parent) = match self.data(current) {
                ValueData::Env(e) => (e.get(name), e.parent()),
                _ => return None,
            };
            if hit.is_some() {
                return hit;
            }
            match parent {
                Some(parent) => current = parent,
                None => {
                    if self.global.as_ref().is_some_and(|g| g.env == current) {
                        return None;
                    }
                    return self.lookup_global(name);
                }
            }
        }
    }

    /// Bind a name in an environment value. `false` on duplicate.
    pub fn env_add(&mut self, env: ValueId, name: Name, value: ValueId) -> bool {
        match self.data_mut(env) {
            ValueData::Env(e) => e.add(name, value),
            _ => false,
        }
    }

    /// Local-only lookup in an environment value.
    pub(crate) fn env_get_local(&self, env: ValueId, name: Name) -> Option<ValueId> {
        match self.data(env) {
            ValueData::Env(e) => e.get(name),
            _ => None,
        }
    }

    fn env_len(&self, env: ValueId) -> usize {
        match self.data(env) {
            ValueData::Env(e) => e.len(),
            _ => 0,
        }
    }
}
