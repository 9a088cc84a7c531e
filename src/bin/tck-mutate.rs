use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tck_mutate::checkers::ExternalCheckers;
use tck_mutate::driver;
use tck_mutate::error::MutateError;
use tracing_subscriber::EnvFilter;

/// TChecker mutation generator
#[derive(Parser, Debug)]
#[command(name = "tck-mutate")]
#[command(about = "Deterministic mutation generator for TChecker system declarations")]
struct Args {
  /// Input TChecker system declaration file
  #[arg(long)]
  pub in_ta: PathBuf,
  /// Directory mutant files are written to
  #[arg(long)]
  pub out_dir: PathBuf,
  /// Operator name, or "all" to run every operator
  #[arg(long)]
  pub op: String,
  /// Constant offset for decrease_constraint_constant / increase_constraint_constant
  #[arg(long)]
  pub val: Option<u32>,
  /// Print tracing output (equivalent to `RUST_LOG=tck_mutate=debug`)
  #[arg(short, long)]
  pub verbose: bool,
  /// Path to the tck-syntax executable (overrides $TCK_SYNTAX_BIN / $PATH)
  #[arg(long)]
  pub tck_syntax_bin: Option<PathBuf>,
  /// Path to the tck-reach executable (overrides $TCK_REACH_BIN / $PATH)
  #[arg(long)]
  pub tck_reach_bin: Option<PathBuf>,
  /// Path to the tck-compare executable (overrides $TCK_COMPARE_BIN / $PATH)
  #[arg(long)]
  pub tck_compare_bin: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    EnvFilter::new(if verbose { "tck_mutate=debug" } else { "tck_mutate=info" })
  });
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
  let args = Args::parse();
  init_tracing(args.verbose);

  let mut checkers = ExternalCheckers::from_env();
  if let Some(bin) = args.tck_syntax_bin {
    checkers.tck_syntax_bin = bin;
  }
  if let Some(bin) = args.tck_reach_bin {
    checkers.tck_reach_bin = bin;
  }
  if let Some(bin) = args.tck_compare_bin {
    checkers.tck_compare_bin = bin;
  }

  driver::warn_if_val_ignored(&args.op, args.val.is_some());
  let val = args.val.unwrap_or(1);

  match driver::run(&args.in_ta, &args.out_dir, &args.op, val, &checkers) {
    Ok(summary) => {
      for counts in &summary.per_operator {
        println!(
          "{}: {} candidates, {} kept, {} bisimilar, {} rejected",
          counts.operator, counts.candidates, counts.kept, counts.bisimilar, counts.rejected
        );
      }
      ExitCode::SUCCESS
    },
    Err(e @ MutateError::UnknownOperator(_)) => {
      eprintln!("{e}");
      ExitCode::from(2)
    },
    Err(e) => {
      eprintln!("{e}");
      ExitCode::FAILURE
    },
  }
}
