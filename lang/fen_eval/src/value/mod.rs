//! Runtime values.
//!
//! A value is a tagged payload stored in a [`Heap`] slot and addressed by
//! [`ValueId`]. Payloads never change after construction; the only mutable
//! part of a slot is its owner tag, which the ownership-transfer machinery
//! in [`crate::context`] manages.
//!
//! The queries on `Heap` in this module are the value-level operations:
//! type compatibility, numeric coercion, truthiness, arity and display.

use std::fmt;

use fen_ir::{ExprId, Name, SharedArena};

use crate::errors::EvalResult;
use crate::heap::{Heap, ValueId};
use crate::Context;
use crate::Environment;

/// Handler signature for built-in functions.
///
/// Called with exactly as many (already forced, type-checked) arguments as
/// the function's declared arity.
pub type NativeHandler = fn(&mut Heap, Context, &[ValueId]) -> EvalResult;

/// A built-in function: a name, per-parameter type constraints (which also
/// fix the arity) and the handler.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: Name,
    pub params: Box<[TypeTag]>,
    pub handler: NativeHandler,
}

/// A user function: parameter names, a body expression and the environment
/// captured where the lambda literal was evaluated.
#[derive(Debug)]
pub struct LambdaFunction {
    pub params: Box<[Name]>,
    pub body: ExprId,
    pub arena: SharedArena,
    pub env: ValueId,
}

/// A function bound to fewer arguments than its arity. Immutable: applying
/// more arguments builds a new value, never mutates this one.
#[derive(Debug)]
pub struct PartialApplication {
    pub base: ValueId,
    pub args: Box<[ValueId]>,
}

/// Value payload.
#[derive(Debug)]
pub enum ValueData {
    Void,
    Bool(bool),
    Int(i64),
    Real(f64),
    Env(Environment),
    Native(NativeFunction),
    Lambda(LambdaFunction),
    Partial(PartialApplication),
}

impl ValueData {
    /// The concrete tag of this payload.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ValueData::Void => TypeTag::Void,
            ValueData::Bool(_) => TypeTag::Bool,
            ValueData::Int(_) => TypeTag::Int,
            ValueData::Real(_) => TypeTag::Real,
            ValueData::Env(_) => TypeTag::Env,
            ValueData::Native(_) => TypeTag::Native,
            ValueData::Lambda(_) => TypeTag::Lambda,
            ValueData::Partial(_) => TypeTag::Partial,
        }
    }
}

/// Type tag, including the three aggregate pseudo-types used in native
/// parameter constraints: `Any` matches everything, `Number` matches
/// `Int`/`Real`, `Func` matches anything callable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTag {
    Void,
    Bool,
    Int,
    Real,
    Env,
    Native,
    Lambda,
    Partial,
    // Aggregates
    Number,
    Func,
    Any,
}

impl TypeTag {
    /// Type-compatibility test.
    pub fn matches(self, data: &ValueData) -> bool {
        match self {
            TypeTag::Any => true,
            TypeTag::Number => matches!(data, ValueData::Int(_) | ValueData::Real(_)),
            TypeTag::Func => matches!(
                data,
                ValueData::Native(_) | ValueData::Lambda(_) | ValueData::Partial(_)
            ),
            concrete => concrete == data.type_tag(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TypeTag::Void => "Void",
            TypeTag::Bool => "Bool",
            TypeTag::Int => "Int",
            TypeTag::Real => "Real",
            TypeTag::Env => "Environment",
            TypeTag::Native | TypeTag::Lambda | TypeTag::Func => "Func",
            TypeTag::Partial => "PartialFunc",
            TypeTag::Number => "Number",
            TypeTag::Any => "Any",
        };
        f.write_str(text)
    }
}

/// Render an `f64` the canonical way: always with a fractional part.
fn format_real(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl Heap {
    /// Type-compatibility test against a live value.
    pub fn is_type(&self, id: ValueId, tag: TypeTag) -> bool {
        tag.matches(self.data(id))
    }

    /// The concrete type tag of a live value.
    pub fn type_tag(&self, id: ValueId) -> TypeTag {
        self.data(id).type_tag()
    }

    /// Coerce an `Int` or `Real` to `f64`.
    ///
    /// # Panics
    /// Panics on non-numeric values; callers validate with the `Number`
    /// constraint first.
    pub fn number_value(&self, id: ValueId) -> f64 {
        match self.data(id) {
            ValueData::Int(v) => *v as f64,
            ValueData::Real(v) => *v,
            other => unreachable!("number_value on {}", other.type_tag()),
        }
    }

    /// Truthiness for branching: zero numbers, `false` and void are false;
    /// everything else (functions included) is true.
    pub fn condition(&self, id: ValueId) -> bool {
        match self.data(id) {
            ValueData::Int(v) => *v != 0,
            ValueData::Real(v) => *v != 0.0,
            ValueData::Bool(b) => *b,
            ValueData::Void => false,
            _ => true,
        }
    }

    /// Remaining arity: how many more arguments this value wants before a
    /// call fires. Zero for anything that is not a function.
    pub fn num_args(&self, id: ValueId) -> usize {
        match self.data(id) {
            ValueData::Native(n) => n.params.len(),
            ValueData::Lambda(l) => l.params.len(),
            ValueData::Partial(p) => self.num_args(p.base).saturating_sub(p.args.len()),
            _ => 0,
        }
    }

    /// A value is trivial when forcing it would be a no-op: anything that
    /// is not a saturated (or over-saturated) function.
    ///
    /// An under-saturated partial over a direct native/lambda base is
    /// trivial; a partial over a partial is not, so forcing flattens the
    /// chain into a single layer.
    pub fn is_trivial(&self, id: ValueId) -> bool {
        match self.data(id) {
            ValueData::Partial(p) => match self.data(p.base) {
                ValueData::Native(_) | ValueData::Lambda(_) => {
                    p.args.len() < self.num_args(p.base)
                }
                _ => false,
            },
            ValueData::Native(_) | ValueData::Lambda(_) => self.num_args(id) > 0,
            _ => true,
        }
    }

    /// Canonical display text.
    pub fn display(&self, id: ValueId) -> String {
        match self.data(id) {
            ValueData::Void => "()".to_owned(),
            ValueData::Bool(true) => "true".to_owned(),
            ValueData::Bool(false) => "false".to_owned(),
            ValueData::Int(v) => v.to_string(),
            ValueData::Real(v) => format_real(*v),
            ValueData::Env(_) => "<Environment>".to_owned(),
            ValueData::Native(n) => {
                format!("<Function '{}'>", self.interner().lookup(n.name))
            }
            ValueData::Lambda(_) | ValueData::Partial(_) => "<Function>".to_owned(),
        }
    }
}
