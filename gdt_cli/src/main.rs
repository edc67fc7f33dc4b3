//! # GD&T Validator CLI
//!
//! Thin driver around `gdt_core`. Reads a JSON array of frame submissions
//! from the file named on the command line, or from stdin when no file is
//! given, and prints a per-frame summary followed by the JSON report.
//!
//! ```text
//! gdt_cli drawing.json
//! cat drawing.json | gdt_cli
//! ```

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use gdt_core::{validate_drawing, DrawingValidation, FrameSubmission, Severity};
use serde::Serialize;

/// JSON report: the drawing validation plus when it was produced
#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    #[serde(flatten)]
    drawing: &'a DrawingValidation,
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().lock().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    let source = path.as_deref().unwrap_or("<stdin>");

    let input = match read_input(path.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", source, e);
            return ExitCode::FAILURE;
        }
    };

    let submissions: Vec<FrameSubmission> = match serde_json::from_str(&input) {
        Ok(submissions) => submissions,
        Err(e) => {
            eprintln!("Error: {}", gdt_core::GdtError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let drawing = match validate_drawing(&submissions) {
        Ok(drawing) => drawing,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    print_summary(&submissions, &drawing);

    let report = Report {
        generated_at: Utc::now(),
        source,
        drawing: &drawing,
    };
    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(&report) {
        println!("{}", json);
    }

    if drawing.passes() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_summary(submissions: &[FrameSubmission], drawing: &DrawingValidation) {
    println!("═══════════════════════════════════════");
    println!("  GD&T VALIDATION RESULTS");
    println!("═══════════════════════════════════════");

    for (index, (submission, result)) in submissions.iter().zip(&drawing.results).enumerate() {
        let frame = &submission.frame;
        println!();
        println!(
            "#{} {} {}{}",
            index + 1,
            frame.tolerance_type,
            frame.tolerance_value,
            frame
                .location
                .as_deref()
                .map(|l| format!("  [{}]", l))
                .unwrap_or_default()
        );
        for issue in &result.issues {
            println!("  {} {}", status_icon(issue.severity), issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("         → {}", suggestion);
            }
        }
        if let Some(total) = result.total_tolerance {
            println!("  total tolerance {:.4}", total);
        }
        if let Some(vc) = result.virtual_condition {
            println!("  virtual condition {:.4}", vc);
        }
    }

    let counts = &drawing.counts;
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} ({} checks, {} passed, {} failed, {} warnings)",
        if drawing.passes() { "PASS" } else { "FAIL" },
        counts.total_checks,
        counts.passed,
        counts.failed,
        counts.warnings
    );
    println!("═══════════════════════════════════════");
}

fn status_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[OK]  ",
        Severity::Warning => "[WARN]",
        Severity::Error | Severity::Critical => "[FAIL]",
    }
}
