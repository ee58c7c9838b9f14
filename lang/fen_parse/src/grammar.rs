//! The grammar rules.

use fen_ir::{
    Binding, Expr, ExprArena, ExprId, ExprKind, Module, Name, SharedInterner, TokenKind, TokenList,
};

use crate::cursor::Cursor;
use crate::{ParseError, ParseErrorKind};

/// Parse a token stream into a module and its expression arena.
pub fn parse_module(
    tokens: &TokenList,
    interner: &SharedInterner,
) -> Result<(Module, ExprArena), ParseError> {
    let mut parser = Parser {
        cursor: Cursor::new(tokens, interner),
        arena: ExprArena::new(),
    };
    let module = parser.parse_program()?;
    tracing::debug!(
        bindings = module.bindings.len(),
        exprs = parser.arena.len(),
        "parsed module"
    );
    Ok((module, parser.arena))
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
}

/// Tokens that can start a term.
fn is_term_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Real(_)
            | TokenKind::LParen
            | TokenKind::KwTrue
            | TokenKind::KwFalse
    )
}

/// Tokens that can start an expression. `match`/`let` are reserved words
/// and deliberately excluded, so they fail with a position attached.
fn is_exp_start(kind: TokenKind) -> bool {
    kind == TokenKind::KwIf || is_term_start(kind)
}

/// Operator precedence; zero means "not an operator".
fn precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Star | TokenKind::Slash => 3,
        TokenKind::Plus | TokenKind::Minus => 2,
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::LessEq
        | TokenKind::GreaterEq
        | TokenKind::Less
        | TokenKind::Greater => 1,
        _ => 0,
    }
}

/// Shunting-yard state for infix chains.
///
/// Each completed operator turns into an application of the operator's
/// *global* binding: `a + b` becomes `(+ a b)`.
struct Yard {
    ops: Vec<TokenKind>,
    exprs: Vec<ExprId>,
}

impl Yard {
    fn new() -> Self {
        Yard {
            ops: Vec::new(),
            exprs: Vec::new(),
        }
    }

    fn pop_math(&mut self, arena: &mut ExprArena, interner: &SharedInterner) {
        let (Some(op), Some(b), Some(a)) = (self.ops.pop(), self.exprs.pop(), self.exprs.pop())
        else {
            return;
        };
        let span = arena.get(a).span.merge(arena.get(b).span);
        let name = interner.intern(op.describe());
        let base = arena.push(Expr::new(ExprKind::Var { name, global: true }, span));
        let args = arena.push_expr_list(&[a, b]);
        self.exprs
            .push(arena.push(Expr::new(ExprKind::Apply { base, args }, span)));
    }

    fn push_op(&mut self, op: TokenKind, arena: &mut ExprArena, interner: &SharedInterner) {
        while let Some(&top) = self.ops.last() {
            if precedence(top) >= precedence(op) {
                self.pop_math(arena, interner);
            } else {
                break;
            }
        }
        self.ops.push(op);
    }

    fn finish(mut self, arena: &mut ExprArena, interner: &SharedInterner) -> ExprId {
        while !self.ops.is_empty() {
            self.pop_math(arena, interner);
        }
        match self.exprs.pop() {
            Some(expr) => expr,
            None => unreachable!("yard holds at least one expression"),
        }
    }
}

impl Parser<'_> {
    /// `program := binding* EOF`
    fn parse_program(&mut self) -> Result<Module, ParseError> {
        let mut module = Module::default();
        loop {
            match self.cursor.kind() {
                TokenKind::Eof => return Ok(module),
                TokenKind::KwFn => {
                    self.cursor.advance();
                    let (name, span) = self.cursor.eat_ident()?;
                    let value = self.parse_function()?;
                    module.bindings.push(Binding { name, span, value });
                }
                TokenKind::KwLet => {
                    return Err(ParseError::new(
                        ParseErrorKind::GlobalConstant,
                        self.cursor.span(),
                    ));
                }
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::Trailing {
                            found: self.cursor.current().describe(self.cursor.interner()),
                        },
                        self.cursor.span(),
                    ));
                }
            }
        }
    }

    /// `binding body := ident* "=" expression`, producing a lambda.
    fn parse_function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.span();
        let mut params: Vec<Name> = Vec::new();
        while let TokenKind::Ident(name) = self.cursor.kind() {
            params.push(name);
            self.cursor.advance();
        }
        self.cursor.eat(TokenKind::Equals)?;
        let body = self.parse_expression()?;
        let span = start.merge(self.arena.get(body).span);
        let params = self.arena.push_names(&params);
        Ok(self
            .arena
            .push(Expr::new(ExprKind::Lambda { params, body }, span)))
    }

    /// `expression := if | infix`
    fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        if !is_exp_start(self.cursor.kind()) {
            return Err(self.cursor.expected("expression"));
        }
        match self.cursor.kind() {
            TokenKind::KwIf => self.parse_if(),
            _ => self.parse_infix(),
        }
    }

    /// `if := "if" expression "then" expression "else" expression`
    fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.span();
        self.cursor.eat(TokenKind::KwIf)?;
        let cond = self.parse_expression()?;
        self.cursor.eat(TokenKind::KwThen)?;
        let then_branch = self.parse_expression()?;
        self.cursor.eat(TokenKind::KwElse)?;
        let else_branch = self.parse_expression()?;
        let span = start.merge(self.arena.get(else_branch).span);
        Ok(self.arena.push(Expr::new(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )))
    }

    /// `infix := application (op application)*`
    fn parse_infix(&mut self) -> Result<ExprId, ParseError> {
        let mut yard = Yard::new();
        let first = self.parse_application()?;
        yard.exprs.push(first);

        while precedence(self.cursor.kind()) > 0 {
            let op = self.cursor.kind();
            self.cursor.advance();
            let rhs = self.parse_application()?;
            yard.push_op(op, &mut self.arena, self.cursor.interner());
            yard.exprs.push(rhs);
        }

        Ok(yard.finish(&mut self.arena, self.cursor.interner()))
    }

    /// `application := term term*`
    fn parse_application(&mut self) -> Result<ExprId, ParseError> {
        let base = self.parse_term()?;
        let mut args: Vec<ExprId> = Vec::new();
        while is_term_start(self.cursor.kind()) {
            args.push(self.parse_term()?);
        }
        if args.is_empty() {
            return Ok(base);
        }
        let last = args[args.len() - 1];
        let span = self.arena.get(base).span.merge(self.arena.get(last).span);
        let args = self.arena.push_expr_list(&args);
        Ok(self
            .arena
            .push(Expr::new(ExprKind::Apply { base, args }, span)))
    }

    /// `term := int | real | ident | "true" | "false" | "(" tuple ")"`
    fn parse_term(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.span();
        let kind = match self.cursor.kind() {
            TokenKind::Int(value) => ExprKind::Int(value),
            TokenKind::Real(bits) => ExprKind::Real(bits),
            TokenKind::Ident(name) => ExprKind::Var {
                name,
                global: false,
            },
            TokenKind::KwTrue => ExprKind::Bool(true),
            TokenKind::KwFalse => ExprKind::Bool(false),
            TokenKind::LParen => return self.parse_tuple(),
            _ => return Err(self.cursor.unexpected()),
        };
        self.cursor.advance();
        Ok(self.arena.push(Expr::new(kind, span)))
    }

    /// `tuple := "(" [expression ("," expression)*] ")"`
    ///
    /// `()` is the void literal and one element is plain grouping; anything
    /// longer is rejected.
    fn parse_tuple(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.span();
        self.cursor.eat(TokenKind::LParen)?;
        let values = self.parse_comma_expressions()?;
        let close = self.cursor.span();
        self.cursor.eat(TokenKind::RParen)?;

        match values.len() {
            0 => Ok(self
                .arena
                .push(Expr::new(ExprKind::Void, open.merge(close)))),
            1 => Ok(values[0]),
            _ => Err(ParseError::new(ParseErrorKind::TuplesUnsupported, open)),
        }
    }

    /// `[expression ("," expression)*]`
    fn parse_comma_expressions(&mut self) -> Result<Vec<ExprId>, ParseError> {
        let mut values = Vec::new();
        if !is_exp_start(self.cursor.kind()) {
            return Ok(values);
        }
        values.push(self.parse_expression()?);
        while self.cursor.kind() == TokenKind::Comma {
            self.cursor.advance();
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Module, ExprArena, SharedInterner) {
        let interner = SharedInterner::new();
        let tokens = match fen_lexer::lex(source, &interner) {
            Ok(tokens) => tokens,
            Err(e) => panic!("lex failed: {e}"),
        };
        match parse_module(&tokens, &interner) {
            Ok((module, arena)) => (module, arena, interner),
            Err(e) => panic!("parse failed on {source:?}: {e}"),
        }
    }

    fn parse_err(source: &str) -> ParseError {
        let interner = SharedInterner::new();
        let tokens = match fen_lexer::lex(source, &interner) {
            Ok(tokens) => tokens,
            Err(e) => panic!("lex failed: {e}"),
        };
        match parse_module(&tokens, &interner) {
            Ok(_) => panic!("expected parse error on {source:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn empty_program() {
        let (module, arena, _) = parse("");
        assert!(module.bindings.is_empty());
        assert!(arena.is_empty());
    }

    #[test]
    fn binding_becomes_lambda() {
        let (module, arena, interner) = parse("fn double x = x + x");
        assert_eq!(module.bindings.len(), 1);
        let binding = module.bindings[0];
        assert_eq!(binding.name, interner.intern("double"));
        let ExprKind::Lambda { params, body: _ } = arena.get(binding.value).kind else {
            panic!("binding value should be a lambda");
        };
        assert_eq!(arena.names_in(params), &[interner.intern("x")]);
    }

    #[test]
    fn constant_binding_is_zero_parameter_lambda() {
        let (module, arena, _) = parse("fn five = 5");
        let ExprKind::Lambda { params, body } = arena.get(module.bindings[0].value).kind else {
            panic!("binding value should be a lambda");
        };
        assert!(params.is_empty());
        assert_eq!(arena.get(body).kind, ExprKind::Int(5));
    }

    #[test]
    fn multiplication_binds_over_addition() {
        // 1 + 2 * 3 parses as (+ 1 (* 2 3))
        let (module, arena, interner) = parse("fn main = 1 + 2 * 3");
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[0].value).kind else {
            panic!("expected lambda");
        };
        let ExprKind::Apply { base, args } = arena.get(body).kind else {
            panic!("expected outer application");
        };
        let ExprKind::Var { name, global: true } = arena.get(base).kind else {
            panic!("expected global operator reference");
        };
        assert_eq!(name, interner.intern("+"));

        let args = arena.exprs_in(args).to_vec();
        assert_eq!(arena.get(args[0]).kind, ExprKind::Int(1));
        let ExprKind::Apply { base, args: inner } = arena.get(args[1]).kind else {
            panic!("rhs should be the multiplication");
        };
        let ExprKind::Var { name, global: true } = arena.get(base).kind else {
            panic!("expected global operator reference");
        };
        assert_eq!(name, interner.intern("*"));
        let inner = arena.exprs_in(inner).to_vec();
        assert_eq!(arena.get(inner[0]).kind, ExprKind::Int(2));
        assert_eq!(arena.get(inner[1]).kind, ExprKind::Int(3));
    }

    #[test]
    fn same_precedence_associates_left() {
        // 1 - 2 - 3 parses as (- (- 1 2) 3)
        let (module, arena, _) = parse("fn main = 1 - 2 - 3");
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[0].value).kind else {
            panic!("expected lambda");
        };
        let ExprKind::Apply { args, .. } = arena.get(body).kind else {
            panic!("expected application");
        };
        let args = arena.exprs_in(args).to_vec();
        assert!(matches!(arena.get(args[0]).kind, ExprKind::Apply { .. }));
        assert_eq!(arena.get(args[1]).kind, ExprKind::Int(3));
    }

    #[test]
    fn application_collects_argument_terms() {
        let (module, arena, interner) = parse("fn main = f 1 2 3");
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[0].value).kind else {
            panic!("expected lambda");
        };
        let ExprKind::Apply { base, args } = arena.get(body).kind else {
            panic!("expected application");
        };
        assert_eq!(
            arena.get(base).kind,
            ExprKind::Var {
                name: interner.intern("f"),
                global: false
            }
        );
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn if_then_else() {
        let (module, arena, _) = parse("fn main = if true then 1 else 2");
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[0].value).kind else {
            panic!("expected lambda");
        };
        let ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } = arena.get(body).kind
        else {
            panic!("expected conditional");
        };
        assert_eq!(arena.get(cond).kind, ExprKind::Bool(true));
        assert_eq!(arena.get(then_branch).kind, ExprKind::Int(1));
        assert_eq!(arena.get(else_branch).kind, ExprKind::Int(2));
    }

    #[test]
    fn unit_and_grouping() {
        let (module, arena, _) = parse("fn a = ()\nfn b = (5)");
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[0].value).kind else {
            panic!("expected lambda");
        };
        assert_eq!(arena.get(body).kind, ExprKind::Void);
        let ExprKind::Lambda { body, .. } = arena.get(module.bindings[1].value).kind else {
            panic!("expected lambda");
        };
        assert_eq!(arena.get(body).kind, ExprKind::Int(5));
    }

    #[test]
    fn tuples_are_rejected() {
        assert_eq!(
            parse_err("fn main = (1, 2)").kind,
            ParseErrorKind::TuplesUnsupported
        );
    }

    #[test]
    fn top_level_let_is_rejected() {
        assert_eq!(
            parse_err("let x = 5").kind,
            ParseErrorKind::GlobalConstant
        );
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse_err("fn main = 1\n)");
        assert!(matches!(err.kind, ParseErrorKind::Trailing { .. }));
    }

    #[test]
    fn missing_equals_is_an_expected_error() {
        let err = parse_err("fn main 5");
        assert!(matches!(err.kind, ParseErrorKind::Expected { .. }));
    }

    #[test]
    fn reserved_match_fails_as_expression() {
        let err = parse_err("fn main = match");
        assert!(matches!(err.kind, ParseErrorKind::Expected { .. }));
    }
}
