//! Flattened expression arena.
//!
//! Expressions are allocated into contiguous storage and referenced by
//! [`ExprId`]. Argument lists and parameter lists are stored
//! in flat side arrays referenced by [`ExprRange`] / [`NameRange`], so every
//! node stays `Copy`.

use std::ops::Deref;
use std::sync::Arc;

use crate::{Expr, Name};

/// Convert a length to `u32`, treating overflow as resource exhaustion.
fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("{what} exceeded u32 capacity"),
    }
}

/// Index of an expression in an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Range of expression ids in the arena's flat list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    /// The empty range.
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Range of names in the arena's flat name storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NameRange {
    start: u32,
    len: u32,
}

impl NameRange {
    /// The empty range.
    pub const EMPTY: NameRange = NameRange { start: 0, len: 0 };

    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Arena for expressions.
///
/// Index spaces:
/// - `exprs`: indexed by [`ExprId`]
/// - `expr_lists`: flat `Vec<ExprId>` sliced by [`ExprRange`] (argument lists)
/// - `names`: flat `Vec<Name>` sliced by [`NameRange`] (parameter lists)
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    names: Vec<Name>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn push(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(to_u32(self.exprs.len(), "expression arena"));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by id.
    #[inline]
    pub fn get(&self, id: ExprId) -> Expr {
        self.exprs[id.index()]
    }

    /// Store an argument list, returning its range.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list storage");
        self.expr_lists.extend_from_slice(ids);
        ExprRange {
            start,
            len: to_u32(ids.len(), "expression list"),
        }
    }

    /// Resolve an argument-list range to a slice.
    #[inline]
    pub fn exprs_in(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Store a parameter-name list, returning its range.
    pub fn push_names(&mut self, names: &[Name]) -> NameRange {
        let start = to_u32(self.names.len(), "name list storage");
        self.names.extend_from_slice(names);
        NameRange {
            start,
            len: to_u32(names.len(), "name list"),
        }
    }

    /// Resolve a name range to a slice.
    #[inline]
    pub fn names_in(&self, range: NameRange) -> &[Name] {
        let start = range.start as usize;
        &self.names[start..start + range.len()]
    }

    /// Number of allocated expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// Shared, immutable handle to a finished arena.
///
/// Lambda values hold one of these so that their body expressions stay
/// alive for as long as any value referencing them does.
#[derive(Clone, Debug)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }
}

impl Deref for SharedArena {
    type Target = ExprArena;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
