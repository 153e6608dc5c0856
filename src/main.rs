//! Cached Method CLI
//!
//! Entry point for the `cached-method` command-line tool. Drives a wrapper
//! around one of the built-in demo methods through a scripted sequence of
//! operations.

use cached_method::{CacheConfig, CacheControl, CacheStatus, CachedMethod, CachedMethodOptions};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cached-method")]
#[command(about = "Exercise a first-result cached method", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sequence of operations against a cached demo method
    Run {
        /// Demo method to wrap
        #[arg(long, short = 'm', value_enum, default_value_t = DemoMethod::Random)]
        method: DemoMethod,

        /// Path to wrapper config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output one JSON record per operation
        #[arg(long)]
        json: bool,

        /// Operations: call[=ARG], clear, disable, enable, status
        #[arg(required = true)]
        ops: Vec<Op>,
    },

    /// Verify a wrapper config file
    Verify {
        /// Path to wrapper config file
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DemoMethod {
    /// Fresh random number on every invocation
    Random,
    /// Number of times the method has run
    Counter,
    /// Returns the call argument
    Echo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Call(Option<String>),
    Clear,
    Disable,
    Enable,
    Status,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some(("call", arg)) => Ok(Op::Call(Some(arg.to_string()))),
            Some((name, _)) => Err(format!("operation '{}' takes no argument", name)),
            None => match s {
                "call" => Ok(Op::Call(None)),
                "clear" => Ok(Op::Clear),
                "disable" => Ok(Op::Disable),
                "enable" => Ok(Op::Enable),
                "status" => Ok(Op::Status),
                other => Err(format!("unknown operation: {}", other)),
            },
        }
    }
}

impl Op {
    fn name(&self) -> &'static str {
        match self {
            Op::Call(_) => "call",
            Op::Clear => "clear",
            Op::Disable => "disable",
            Op::Enable => "enable",
            Op::Status => "status",
        }
    }
}

/// Outcome of one operation.
#[derive(Debug, Serialize)]
struct OpRecord {
    op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    status: CacheStatus,
}

type DemoFn = fn(&Cell<u64>, Option<String>) -> Value;

fn demo_fn(method: DemoMethod) -> DemoFn {
    fn random(runs: &Cell<u64>, _: Option<String>) -> Value {
        runs.set(runs.get() + 1);
        json!(rand::random::<f64>())
    }
    fn counter(runs: &Cell<u64>, _: Option<String>) -> Value {
        runs.set(runs.get() + 1);
        json!(runs.get())
    }
    fn echo(runs: &Cell<u64>, arg: Option<String>) -> Value {
        runs.set(runs.get() + 1);
        arg.map(Value::String).unwrap_or(Value::Null)
    }

    match method {
        DemoMethod::Random => random,
        DemoMethod::Counter => counter,
        DemoMethod::Echo => echo,
    }
}

fn run_ops(method: DemoMethod, config: CacheConfig, ops: &[Op]) -> cached_method::Result<Vec<OpRecord>> {
    let options = CachedMethodOptions::new()
        .method(demo_fn(method))
        .context(Cell::new(0))
        .config(config);
    let wrapper = CachedMethod::from_options(options)?;

    let records = ops
        .iter()
        .map(|op| {
            let value = match op {
                Op::Call(arg) => Some(wrapper.call(arg.clone())),
                Op::Clear => {
                    wrapper.clear_cache();
                    None
                }
                Op::Disable => {
                    wrapper.disable();
                    None
                }
                Op::Enable => {
                    wrapper.enable();
                    None
                }
                Op::Status => None,
            };
            OpRecord {
                op: op.name(),
                value,
                status: wrapper.status(),
            }
        })
        .collect();
    Ok(records)
}

fn load_config(config_path: Option<PathBuf>) -> Result<CacheConfig, String> {
    match config_path {
        Some(path) => CacheConfig::load(&path).map_err(|e| e.to_string()),
        None => Ok(CacheConfig::default()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            method,
            config,
            json,
            ops,
        } => {
            run(method, config, json, &ops);
        }
        Commands::Verify { config } => {
            run_verify(config);
        }
    }
}

fn run(method: DemoMethod, config_path: Option<PathBuf>, json_output: bool, ops: &[Op]) {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let records = match run_ops(method, config, ops) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            process::exit(1);
        }
    };

    for record in records {
        if json_output {
            match serde_json::to_string(&record) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("Error serializing record: {}", e);
                    process::exit(1);
                }
            }
        } else {
            let value = record
                .value
                .as_ref()
                .map(|v| format!(" -> {}", v))
                .unwrap_or_default();
            println!(
                "{}{} [{}] invocations={} hits={}",
                record.op, value, record.status.state, record.status.invocations, record.status.hits
            );
        }
    }
}

/// Lines printed by `verify` for a valid config.
fn verify_report(config_path: &Path) -> cached_method::Result<Vec<String>> {
    let config = CacheConfig::load(config_path)?;
    Ok(vec![
        format!("Configuration valid: {}", config_path.display()),
        String::new(),
        format!("  Name: {}", config.label()),
        format!("  Enabled: {}", config.enabled),
    ])
}

fn run_verify(config_path: PathBuf) {
    match verify_report(&config_path) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Configuration error [{}]: {}", e.code(), e);
            process::exit(1);
        }
    }
}
