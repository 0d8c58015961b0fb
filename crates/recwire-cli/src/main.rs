//! `recwire` CLI: convert and inspect JSON wire trees from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Convert snake_case keys to camelCase at every depth (stdin → stdout)
//! echo '{"user_name":"Alice","home_address":{"zip_code":"12345"}}' | recwire camelize
//!
//! # File to file, pretty-printed
//! recwire camelize -i data.json -o data.camel.json --pretty
//!
//! # Check that a file parses and summarize its shape
//! recwire check -i data.json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see codec activity.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recwire_core::{CodecOptions, TreeCodec, Value};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "recwire",
    version,
    about = "Record wire codec CLI",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every object key from snake_case to camelCase
    Camelize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse JSON and report its shape
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Camelize {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let tree = recwire_core::codec::parse(&text).context("Failed to parse input JSON")?;
            let options = CodecOptions::new().camel_out(true).pretty(pretty);
            let camel = TreeCodec::default()
                .encode_value(&Value::from_wire(&tree), &options)
                .context("Failed to convert keys")?;
            let rendered = recwire_core::codec::render(&camel, options.pretty)
                .context("Failed to render output JSON")?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let tree = recwire_core::codec::parse(&text).context("Input is not valid JSON")?;
            debug!(bytes = text.len(), "input parsed");
            println!("ok: {}", shape(&tree));
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for piping. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// One-line summary of a wire tree's top level.
fn shape(tree: &serde_json::Value) -> String {
    match tree {
        serde_json::Value::Object(map) => format!("object with {} keys", map.len()),
        serde_json::Value::Array(items) => format!("array of {} items", items.len()),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::Bool(_) => "bool".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_summaries() {
        assert_eq!(shape(&json!({"a": 1, "b": 2})), "object with 2 keys");
        assert_eq!(shape(&json!([1, 2, 3])), "array of 3 items");
        assert_eq!(shape(&json!("x")), "string");
        assert_eq!(shape(&json!(null)), "null");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
