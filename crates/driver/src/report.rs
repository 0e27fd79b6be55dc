//! Console report for bounds-check findings.

use colored::Colorize;

use gepcheck_analysis::{Finding, Verdict};

/// Counts of findings per verdict: `(safe, out_of_bounds, undecided)`.
pub fn tally(findings: &[Finding]) -> (usize, usize, usize) {
    let mut safe = 0;
    let mut oob = 0;
    let mut undecided = 0;
    for finding in findings {
        match &finding.verdict {
            Verdict::Safe => safe += 1,
            Verdict::OutOfBounds(_) => oob += 1,
            Verdict::Undecided(_) => undecided += 1,
        }
    }
    (safe, oob, undecided)
}

/// One plain-text line per finding, without color. Used for tests and as
/// the payload the colored printer decorates.
pub fn render_finding(finding: &Finding) -> String {
    let location = format!(
        "{}: gep '{}' in block '{}' ([{} x i32])",
        finding.function, finding.gep_result, finding.block, finding.array_len
    );
    match &finding.verdict {
        Verdict::Safe => format!("[SAFE] {location}"),
        Verdict::OutOfBounds(Some(model)) => {
            format!("[OOB] {location}\n      witness: {model}")
        }
        Verdict::OutOfBounds(None) => format!("[OOB] {location}"),
        Verdict::Undecided(reason) => format!("[UNKNOWN] {location} ({reason})"),
    }
}

/// Print the full report: one line per finding plus a summary.
pub fn print_report(findings: &[Finding]) {
    for finding in findings {
        let line = render_finding(finding);
        match &finding.verdict {
            Verdict::Safe => println!("{}", line.green()),
            Verdict::OutOfBounds(_) => println!("{}", line.red().bold()),
            Verdict::Undecided(_) => println!("{}", line.yellow()),
        }
    }

    let (safe, oob, undecided) = tally(findings);
    println!();
    if findings.is_empty() {
        println!("{}", "no array accesses to check".dimmed());
    } else {
        println!(
            "{} checked: {} safe, {} out of bounds, {} undecided",
            findings.len(),
            safe.to_string().green(),
            oob.to_string().red(),
            undecided.to_string().yellow()
        );
    }
}
