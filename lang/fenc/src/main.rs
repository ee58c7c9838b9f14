//! Fen interpreter CLI.

use fenc::commands::{lex_file, parse_file, run_file};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    if verbose {
        init_tracing();
    }

    let command = &args[1];
    let file_arg = args.iter().skip(2).find(|a| !a.starts_with('-'));

    match command.as_str() {
        "run" => {
            let Some(path) = file_arg else {
                eprintln!("Usage: fen run <file.fen> [--verbose]");
                std::process::exit(1);
            };
            run_file(path);
        }
        "lex" => {
            let Some(path) = file_arg else {
                eprintln!("Usage: fen lex <file.fen>");
                std::process::exit(1);
            };
            lex_file(path);
        }
        "parse" => {
            let Some(path) = file_arg else {
                eprintln!("Usage: fen parse <file.fen>");
                std::process::exit(1);
            };
            parse_file(path);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" => {
            println!("Fen {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // If it looks like a script path, just run it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("fen"))
            {
                run_file(command);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("Fen interpreter");
    println!();
    println!("Usage: fen <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.fen>       Run a script: evaluate its bindings and force `main`");
    println!("  lex <file.fen>       Tokenize and display tokens");
    println!("  parse <file.fen>     Parse and display binding info");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --verbose, -v        Enable tracing output (respects RUST_LOG)");
    println!();
    println!("Examples:");
    println!("  fen run program.fen");
    println!("  fen run program.fen --verbose");
    println!("  fen lex program.fen");
}
