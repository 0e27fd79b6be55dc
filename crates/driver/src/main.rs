//! `gepcheck` command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use gepcheck_analysis::{analyze_module, EncodingMode};
use gepcheck_driver::{loader, report};
use gepcheck_solver::{CliSolver, SolverConfig, SolverKind};

const USAGE: &str = "\
Usage: gepcheck <program.json> [options]

Options:
  --mode <direct|parametric>    result encoding (default: direct)
  --solver <z3|cvc5|yices>      SMT solver backend (default: z3)
  --timeout-ms <N>              per-query solver timeout in milliseconds";

struct Options {
    program: PathBuf,
    mode: EncodingMode,
    solver: SolverKind,
    timeout_ms: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut program = None;
    let mut mode = EncodingMode::Direct;
    let mut solver = SolverKind::Z3;
    let mut timeout_ms = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                let value = args.next().ok_or("--mode requires a value")?;
                mode = match value.as_str() {
                    "direct" => EncodingMode::Direct,
                    "parametric" => EncodingMode::Parametric,
                    other => return Err(format!("unknown mode: {other}")),
                };
            }
            "--solver" => {
                let value = args.next().ok_or("--solver requires a value")?;
                solver = value.parse()?;
            }
            "--timeout-ms" => {
                let value = args.next().ok_or("--timeout-ms requires a value")?;
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid timeout: {value}"))?;
                timeout_ms = Some(ms);
            }
            "--help" | "-h" => return Err(String::new()),
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => {
                if program.is_some() {
                    return Err("only one program file may be given".to_string());
                }
                program = Some(PathBuf::from(other));
            }
        }
    }

    let program = program.ok_or("missing program file")?;
    Ok(Options {
        program,
        mode,
        solver,
        timeout_ms,
    })
}

fn run(opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let module = loader::load_module(&opts.program)?;

    let mut config = SolverConfig::auto_detect_for(opts.solver)?;
    if let Some(ms) = opts.timeout_ms {
        config = config.with_timeout(ms);
    }
    let solver = CliSolver::new(config);

    let findings = analyze_module(&module, opts.mode, &solver)?;
    report::print_report(&findings);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}\n");
            }
            eprintln!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
