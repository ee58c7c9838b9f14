//! Runtime errors.
//!
//! Factory functions are the public API: they populate both the structured
//! `kind` and the rendered `message`, so call sites stay one-liners and the
//! message catalogue lives in one place.

use std::fmt;

use fen_diagnostic::{Diagnostic, ErrorCode};
use fen_ir::Span;

use crate::value::TypeTag;
use crate::ValueId;

/// Result of evaluation.
pub type EvalResult<T = ValueId> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// Variable lookup failed in every enclosing scope and globally.
    UndefinedVariable { name: String },
    /// Native call argument does not satisfy its declared type constraint.
    WrongArgType {
        index: usize,
        function: String,
        expected: TypeTag,
    },
    /// Division by zero, caught before the division handler runs.
    DivisionByZero,
    /// Applying a value that is not a function.
    NotApplicable { value: String },
    /// Installing a binding over an existing name.
    DuplicateBinding { name: String },
    /// The script has no `main` binding.
    NoMainFunction,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => {
                write!(f, "could not find variable '{name}'")
            }
            Self::WrongArgType {
                index,
                function,
                expected,
            } => write!(
                f,
                "invalid argument #{index} to function '{function}', expected {expected}"
            ),
            Self::DivisionByZero => write!(f, "unwilling to divide by zero"),
            Self::NotApplicable { value } => write!(f, "cannot apply value {value}"),
            Self::DuplicateBinding { name } => {
                write!(f, "cannot override existing '{name}'")
            }
            Self::NoMainFunction => write!(f, "no main function"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message, rendered from the kind.
    pub message: String,
    /// Source location where the error occurred, when known.
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a source location, replacing any existing one.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a source location only if none is set yet. The innermost
    /// evaluation frame wins.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.kind {
            EvalErrorKind::UndefinedVariable { .. } => ErrorCode::E2001,
            EvalErrorKind::WrongArgType { .. } => ErrorCode::E2002,
            EvalErrorKind::DivisionByZero => ErrorCode::E2003,
            EvalErrorKind::NotApplicable { .. } => ErrorCode::E2004,
            EvalErrorKind::DuplicateBinding { .. } => ErrorCode::E2005,
            EvalErrorKind::NoMainFunction => ErrorCode::E2006,
        };
        let diag = Diagnostic::error(code, self.message.clone());
        match self.span {
            Some(span) => diag.with_label(span, ""),
            None => diag,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

pub fn wrong_arg_type(index: usize, function: &str, expected: TypeTag) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgType {
        index,
        function: function.to_owned(),
        expected,
    })
}

pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

pub fn not_applicable(value: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotApplicable {
        value: value.into(),
    })
}

pub fn duplicate_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateBinding {
        name: name.to_owned(),
    })
}

pub fn no_main_function() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMainFunction)
}
