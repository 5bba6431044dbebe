//! Helpers to run the `cbs-solver` binary from the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The result of running the binary on a single instance.
#[derive(Debug)]
pub(crate) struct SolverRun {
    pub(crate) success: bool,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl SolverRun {
    /// The lines of the output which are not prefixed as comments.
    pub(crate) fn answers(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| !line.starts_with("c "))
            .collect()
    }
}

pub(crate) fn instance_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(name)
}

pub(crate) fn run_solver(instance: &str) -> SolverRun {
    run_solver_with_options(instance, std::iter::empty(), "default")
}

/// Runs the solver on the instance with the given name in `tests/instances`.
///
/// The output is redirected to files named after the instance and `prefix`, which are removed
/// again once they are read; tests running in parallel on the same instance need distinct
/// prefixes.
pub(crate) fn run_solver_with_options<'a>(
    instance: &str,
    args: impl IntoIterator<Item = &'a str>,
    prefix: &str,
) -> SolverRun {
    let instance_path = instance_path(instance);
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_cbs-solver"));

    let log_file_path = instance_path.with_extension(format!("{prefix}.log"));
    let err_file_path = instance_path.with_extension(format!("{prefix}.err"));

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(&instance_path)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let success = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => {
            let _ = child.kill();
            panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Ok(Some(status)) => status.success(),
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");
    let stderr = std::fs::read_to_string(&err_file_path).expect("Failed to read error file.");
    std::fs::remove_file(log_file_path).expect("Failed to remove log file.");
    std::fs::remove_file(err_file_path).expect("Failed to remove error file.");

    SolverRun {
        success,
        stdout,
        stderr,
    }
}
