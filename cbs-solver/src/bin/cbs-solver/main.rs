mod aiger;
mod result;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use cbs_solver::core::convert_case::Case;
use cbs_solver::core::statistics::configure_statistic_logging;
use cbs_solver::miter::solve_miter;
use cbs_solver::miter::OutputStatus;
use cbs_solver::options::BranchingHeuristic;
use cbs_solver::options::PropagationMode;
use cbs_solver::options::SolverOptions;
use cbs_solver::CircuitSolver;
use clap::Parser;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use result::CbsError;
use result::CbsResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The circuit to solve, given in the ASCII AIGER format ('*.aag'). Every output of the
    /// circuit is treated as a miter output; the solver decides whether it can be true.
    instance_path: PathBuf,

    /// The number of resolved conflicts after which the solver gives up on an output.
    #[arg(long = "conflict-limit", default_value_t = 1000)]
    conflict_limit: u64,

    /// The size of the justification frontier after which the solver gives up on an output.
    #[arg(long = "justification-limit", default_value_t = 500)]
    justification_limit: usize,

    /// Determines which unjustified gate is branched on.
    #[arg(long = "branching-heuristic", value_enum, default_value_t)]
    branching_heuristic: BranchingHeuristic,

    /// Determines how the gate semantics are propagated.
    #[arg(long = "propagation-mode", value_enum, default_value_t)]
    propagation_mode: PropagationMode,

    /// Log the statistics of the solver once all outputs are decided.
    #[arg(short = 's', long = "log-statistics", default_value_t = false)]
    log_statistics: bool,

    /// Enables log message output from the solver, including the statistics of the engine.
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics || verbose {
        configure_statistic_logging("c", None, Some(Case::Camel), None);
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> CbsResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    if args.instance_path.extension().and_then(|ext| ext.to_str()) != Some("aag") {
        return Err(CbsError::invalid_instance(args.instance_path.display()));
    }

    if cbs_solver::core::asserts::CBS_ASSERT_LEVEL_DEFINITION
        >= cbs_solver::core::asserts::CBS_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            cbs_solver::core::asserts::CBS_ASSERT_LEVEL_DEFINITION
        );
    }

    let aig = aiger::parse_aag(File::open(&args.instance_path)?)?;
    info!(
        "Parsed a circuit with {} inputs, {} gates and {} outputs",
        aig.num_inputs(),
        aig.num_ands(),
        aig.outputs().len()
    );

    let options = SolverOptions {
        conflict_limit: args.conflict_limit,
        justification_limit: args.justification_limit,
        branching_heuristic: args.branching_heuristic,
        propagation_mode: args.propagation_mode,
        verbose: args.verbose,
    };
    let mut solver = CircuitSolver::with_options(&aig, options);

    let statuses = solve_miter(&mut solver, aig.outputs());
    for status in statuses {
        match status {
            OutputStatus::Proved => println!("UNSAT"),
            OutputStatus::Disproved(model) => {
                let bits: String = model
                    .to_input_vector(aig.num_inputs())
                    .into_iter()
                    .map(|value| if value { '1' } else { '0' })
                    .collect();
                println!("SAT {bits}");
            }
            OutputStatus::Undecided => println!("UNKNOWN"),
        }
    }

    if args.log_statistics && !args.verbose {
        solver.log_statistics();
    }

    Ok(())
}
