//! archgraph: validate, inspect and generate architecture graph files.

use tracing_subscriber::EnvFilter;

mod commands;
mod output;

fn print_help() {
    println!("archgraph: architecture graph toolkit");
    println!();
    println!("Usage: archgraph <command> [args]");
    println!();
    println!("Commands:");
    println!("  validate <file> [--graph] [--json]      Validate an envelope (or bare graph) file");
    println!("  summary <file> [--json]                 Print kind counts, hubs and consistency warnings");
    println!("  tree <file> [--level L] [--expand ids]  Print nodes visible at a detail level");
    println!("                                          L = overview|service|module|code");
    println!("  sample [out]                            Write the built-in sample envelope");
    println!("  analyze <repo> [-o out] [--max-files N] Generate an envelope with an LLM");
    println!("  help                                    Show this help message");
    println!();
    println!("Exit status: 0 ok, 1 validation failed, 2 unreadable or unparseable input.");
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_help();
        std::process::exit(2);
    };
    let rest = &args[2..];

    let result = match command.as_str() {
        "validate" | "--validate" => commands::validate(rest),
        "summary" => commands::summary(rest),
        "tree" => commands::tree(rest),
        "sample" => commands::sample(rest),
        "analyze" => commands::analyze(rest).await,
        "--help" | "-h" | "help" => {
            print_help();
            Ok(0)
        }
        _ => {
            eprintln!("Unknown command: {}. Use 'archgraph help' for usage.", command);
            Ok(2)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}
