use std::io::Write;
use std::process::{Command, Stdio};

use gepcheck_smtlib::script::Script;

use crate::config::{SolverConfig, SolverKind};
use crate::error::SolverError;
use crate::parser::parse_solver_output;
use crate::result::SolverResult;

/// Subprocess-based SMT solver interface.
///
/// Communicates with the configured solver by spawning it as a subprocess
/// and piping SMT-LIB2 text to its stdin. Each `check_sat` call is a fresh
/// one-shot process; no state persists between queries.
#[derive(Debug)]
pub struct CliSolver {
    config: SolverConfig,
}

impl CliSolver {
    /// Create a new `CliSolver` with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a `CliSolver` with auto-detected Z3 location and default settings.
    pub fn with_default_config() -> Result<Self, SolverError> {
        let config = SolverConfig::auto_detect()?;
        Ok(Self { config })
    }

    /// Create a `CliSolver` for a specific solver kind with auto-detection.
    pub fn with_default_config_for(kind: SolverKind) -> Result<Self, SolverError> {
        let config = SolverConfig::auto_detect_for(kind)?;
        Ok(Self { config })
    }

    /// Get a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Check satisfiability of a script.
    ///
    /// Renders the script to SMT-LIB2 text via `Display` and appends
    /// `(check-sat)` and `(get-model)` when the script does not already
    /// contain them.
    pub fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        let mut smtlib = script.to_string();

        if !script.has_check_sat() {
            smtlib.push_str("(check-sat)\n");
        }
        if !script.has_get_model() {
            smtlib.push_str("(get-model)\n");
        }

        self.check_sat_raw(&smtlib)
    }

    /// Check satisfiability from a raw SMT-LIB2 string.
    pub fn check_sat_raw(&self, smtlib: &str) -> Result<SolverResult, SolverError> {
        self.config.validate()?;

        let args = self.config.build_args();
        tracing::debug!(
            solver = %self.config.kind,
            bytes = smtlib.len(),
            "dispatching satisfiability query"
        );

        let mut child = Command::new(&self.config.path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Process(format!("failed to start solver: {e}")))?;

        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| SolverError::Process("failed to open solver stdin".to_string()))?;
            stdin
                .write_all(smtlib.as_bytes())
                .map_err(|e| SolverError::Process(format!("failed to write to solver: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::Process(format!("failed to wait for solver: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // A definitive verdict on stdout always wins; stderr mentioning
        // "timeout" (e.g. a flag deprecation warning) is only consulted
        // when stdout yields no parsable answer.
        match parse_solver_output(&stdout, &stderr) {
            Ok(result) => Ok(result),
            Err(e) => {
                if stderr.contains("timeout") {
                    Ok(SolverResult::Unknown("timeout".to_string()))
                } else {
                    Err(e)
                }
            }
        }
    }
}
