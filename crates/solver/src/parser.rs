use crate::error::SolverError;
use crate::model::Model;
use crate::result::SolverResult;

/// Parse the solver's stdout into a `SolverResult`.
///
/// Expected output format:
/// - First non-empty line: `sat`, `unsat`, or `unknown`
/// - If `sat`: subsequent lines contain the `(get-model)` output
pub fn parse_solver_output(stdout: &str, stderr: &str) -> Result<SolverResult, SolverError> {
    let stdout = stdout.trim();

    if stdout.is_empty() {
        if stderr.contains("timeout") {
            return Ok(SolverResult::Unknown("timeout".to_string()));
        }
        return Err(SolverError::Parse(format!(
            "empty solver output. stderr: {stderr}"
        )));
    }

    let first_line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    match first_line {
        "unsat" => Ok(SolverResult::Unsat),
        "sat" => Ok(SolverResult::Sat(parse_model(stdout))),
        "unknown" => Ok(SolverResult::Unknown(unknown_reason(stdout, stderr))),
        "timeout" => Ok(SolverResult::Unknown("timeout".to_string())),
        _ => Err(SolverError::Parse(format!(
            "unexpected solver output: {first_line}"
        ))),
    }
}

/// Extract the reason string for an "unknown" result.
///
/// Z3 sometimes prints the reason on the line after `unknown`, often
/// parenthesized like `(timeout)`.
fn unknown_reason(stdout: &str, stderr: &str) -> String {
    let after_unknown = stdout
        .lines()
        .skip_while(|line| line.trim() != "unknown")
        .skip(1)
        .map(str::trim)
        .find(|line| !line.is_empty());

    if let Some(reason) = after_unknown {
        reason
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string()
    } else if !stderr.is_empty() {
        stderr.trim().to_string()
    } else {
        "unknown".to_string()
    }
}

/// Parse a model from solver output.
///
/// Solvers print models in two known shapes:
///
/// ```text
/// (               |  (model
///   (define-fun x () (_ BitVec 32)
///     (_ bv5 32))
/// )               |  )
/// ```
///
/// Only nullary `define-fun` entries (free constants) are collected;
/// defined functions with parameters are skipped.
fn parse_model(output: &str) -> Option<Model> {
    if !output.contains("(define-fun ") {
        return None;
    }

    let mut assignments = Vec::new();
    let mut pos = 0;

    while let Some(def_pos) = output[pos..].find("(define-fun ") {
        let start = pos + def_pos;
        let after_keyword = start + "(define-fun ".len();

        match find_sexp_end(output, start) {
            Some(end) => {
                // Strip the opening `(define-fun ` and the closing `)`.
                let body = &output[after_keyword..end - 1];
                if let Some((name, value)) = parse_define_fun(body) {
                    assignments.push((name, value));
                }
                pos = end;
            }
            None => pos = after_keyword,
        }
    }

    if assignments.is_empty() {
        None
    } else {
        Some(Model::with_assignments(assignments))
    }
}

/// Find the end of the S-expression whose `(` is at `start`.
/// Returns the index just past the matching `)`.
fn find_sexp_end(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if start >= bytes.len() || bytes[start] != b'(' {
        return None;
    }

    let mut depth = 1;
    let mut i = start + 1;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }

    if depth == 0 {
        Some(i)
    } else {
        None
    }
}

/// Skip one S-expression (compound or atom) starting at `pos`.
fn skip_sexp(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() {
        return None;
    }

    if bytes[pos] == b'(' {
        find_sexp_end(input, pos)
    } else {
        let mut i = pos;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'('
            && bytes[i] != b')'
        {
            i += 1;
        }
        Some(i)
    }
}

/// Parse a single `define-fun` body: `name () sort value`.
///
/// The value may itself be a compound S-expression like `(_ bv5 32)`.
/// Returns `None` for defined functions with parameters.
fn parse_define_fun(input: &str) -> Option<(String, String)> {
    // Collapse multi-line bodies into single-space-separated tokens.
    let normalized: String = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let input = normalized.trim();
    if input.is_empty() {
        return None;
    }

    let name_end = input.find(|c: char| c.is_whitespace())?;
    let name = input[..name_end].to_string();
    let rest = input[name_end..].trim_start();

    // Nullary functions only.
    if !rest.starts_with("()") {
        return None;
    }
    let rest = rest[2..].trim_start();

    // Skip the sort (an atom like `Bool` or a compound like `(_ BitVec 32)`),
    // then take everything remaining as the value.
    let after_sort = skip_sexp(rest, 0)?;
    let value = rest[after_sort..].trim().to_string();
    if value.is_empty() {
        return None;
    }

    Some((name, value))
}
