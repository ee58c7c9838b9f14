//! The interpreter facade.
//!
//! Owns a heap and a root context, installs parsed modules and forces
//! bindings. This is the surface the CLI and the end-to-end tests use.

use fen_ir::{Module, SharedArena, SharedInterner};

use crate::apply;
use crate::errors::{duplicate_binding, no_main_function, EvalResult};
use crate::exec;
use crate::heap::{Heap, ValueId};
use crate::Context;

pub struct Interpreter {
    heap: Heap,
    root: Context,
}

impl Interpreter {
    /// Create an interpreter with a fresh heap and a root context whose
    /// environment falls back to the global one.
    pub fn new(interner: SharedInterner) -> Self {
        let mut heap = Heap::new(interner);
        let root = heap.new_context(None);
        Interpreter { heap, root }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn root(&self) -> Context {
        self.root
    }

    /// Evaluate a module's bindings in order and install them in the root
    /// environment. A name collision is a duplicate-binding error pointing
    /// at the offending binding.
    pub fn install(&mut self, arena: &SharedArena, module: &Module) -> EvalResult<()> {
        for binding in &module.bindings {
            let value = exec::eval(arena, binding.value, &mut self.heap, self.root)?;
            let env = self.heap.context_env(self.root);
            if !self.heap.env_add(env, binding.name, value) {
                let name = self.heap.interner().lookup(binding.name);
                return Err(duplicate_binding(name).with_span(binding.span));
            }
        }
        Ok(())
    }

    /// Resolve a name in the root environment (falling back globally).
    pub fn lookup(&mut self, name: &str) -> Option<ValueId> {
        let name = self.heap.interner().intern(name);
        let env = self.heap.context_env(self.root);
        self.heap.lookup(env, name)
    }

    /// Force a value to normal form in the root context.
    pub fn force(&mut self, value: ValueId) -> EvalResult {
        apply::force(&mut self.heap, self.root, value)
    }

    /// Canonical display text for a value.
    pub fn display(&self, value: ValueId) -> String {
        self.heap.display(value)
    }

    /// Look up `main`, force it and render the result — the whole
    /// entry-point protocol in one call.
    pub fn run_main(&mut self) -> EvalResult<String> {
        let main = self.lookup("main").ok_or_else(no_main_function)?;
        let result = self.force(main)?;
        Ok(self.heap.display(result))
    }
}
