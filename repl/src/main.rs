use std::{
    io::{BufRead, Write},
    process::ExitCode,
};

use calculator::{join, tokenise, Evaluator, Token};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Evaluates arithmetic written as whitespace-separated tokens, e.g. `( 3 + 4 ) * Ans`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate one expression and exit instead of starting the prompt.
    #[arg(short, long)]
    expression: Option<String>,

    /// Log evaluation spans at debug level when RUST_LOG is unset.
    #[arg(short, long)]
    verbose: bool,
}

fn evaluate_line(evaluator: &mut Evaluator, line: &str) -> Result<f64, String> {
    let tokens = tokenise(line).map_err(|e| e.to_string())?;
    evaluator.evaluate(&tokens).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut evaluator = Evaluator::new();

    if let Some(expression) = args.expression {
        return match evaluate_line(&mut evaluator, &expression) {
            Ok(value) => {
                println!("{}", Token::Number(value));
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        };
    }

    println!("calculator REPL: ");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("\x1b[0;36m > ");

        print!("\x1b[0;0m");

        if let Err(error) = std::io::stdout().flush() {
            tracing::error!(%error, "failed to flush stdout");
            return ExitCode::FAILURE;
        }

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(error) => {
                tracing::error!(%error, "failed to read stdin");
                return ExitCode::FAILURE;
            }
        }

        match line.trim() {
            "" => continue,
            "exit" => return ExitCode::SUCCESS,
            "history" => {
                for entry in evaluator.history() {
                    println!(
                        "{} = {}",
                        join(entry.tokens()),
                        Token::Number(entry.result())
                    );
                }
            }
            input => match evaluate_line(&mut evaluator, input) {
                Ok(value) => println!("{}", Token::Number(value)),
                Err(error) => println!("\x1b[0;31m{error}\x1b[0;0m"),
            },
        }
    }
}
