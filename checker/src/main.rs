use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "propcheck")]
#[command(about = "Validate and inspect property documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a property document and report the result
    Check {
        /// Input document
        input: PathBuf,
    },

    /// Parse a document and print its canonical form
    Dump {
        /// Input document
        input: PathBuf,
    },

    /// Parse single properties interactively from stdin
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input } => check_document(&input),
        Commands::Dump { input } => dump_document(&input),
        Commands::Repl => run_repl(),
    }
}

fn check_document(input: &Path) -> Result<()> {
    let document = propcheck::check_file(input)?;
    println!(
        "{}: {} top-level properties",
        input.display(),
        document.len()
    );
    Ok(())
}

fn dump_document(input: &Path) -> Result<()> {
    let document = propcheck::check_file(input)?;
    print!("{}", document);
    Ok(())
}

fn run_repl() -> Result<()> {
    println!("propcheck - parse single properties");
    println!("Empty line or q quits\n");

    prompt()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('q') || line.starts_with('Q') {
            break;
        }
        match props::parse_property(&line) {
            Ok(property) => println!("{}", property),
            Err(error) => propcheck::report("<stdin>", &line, &error)?,
        }
        prompt()?;
    }

    println!("[quit]");
    Ok(())
}

fn prompt() -> Result<()> {
    print!(">>> ");
    io::stdout().flush()?;
    Ok(())
}
