//! Command implementations: run, lex, parse.

use fen_eval::Interpreter;
use fen_ir::{SharedArena, SharedInterner, TokenKind};

use crate::reporting::report;

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: could not open file '{path}': {e}");
            std::process::exit(1);
        }
    }
}

/// Run a script: evaluate its bindings into a root context, force `main`
/// and print the result's display string.
pub fn run_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();

    let tokens = match fen_lexer::lex(&source, &interner) {
        Ok(tokens) => tokens,
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    };

    let (module, arena) = match fen_parse::parse_module(&tokens, &interner) {
        Ok(parsed) => parsed,
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    };
    let arena = SharedArena::new(arena);

    let mut interp = Interpreter::new(interner);
    if let Err(e) = interp.install(&arena, &module) {
        report(&e.to_diagnostic(), &source, path);
        std::process::exit(1);
    }

    match interp.run_main() {
        Ok(output) => println!("{output}"),
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    }
}

/// Tokenize a file and print one token per line.
pub fn lex_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();

    match fen_lexer::lex(&source, &interner) {
        Ok(tokens) => {
            for token in tokens.iter() {
                if token.kind == TokenKind::Eof {
                    break;
                }
                println!(
                    "{:>5}..{:<5} {}",
                    token.span.start,
                    token.span.end,
                    token.describe(&interner)
                );
            }
            println!("{} tokens", tokens.len());
        }
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    }
}

/// Parse a file and print its top-level bindings.
pub fn parse_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();

    let tokens = match fen_lexer::lex(&source, &interner) {
        Ok(tokens) => tokens,
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    };

    match fen_parse::parse_module(&tokens, &interner) {
        Ok((module, arena)) => {
            for binding in &module.bindings {
                println!("fn {}", interner.lookup(binding.name));
            }
            println!(
                "{} bindings, {} expression nodes",
                module.bindings.len(),
                arena.len()
            );
        }
        Err(e) => {
            report(&e.to_diagnostic(), &source, path);
            std::process::exit(1);
        }
    }
}
