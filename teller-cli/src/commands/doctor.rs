//! Doctor command - run store health checks

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use serde_json::Value;

use super::get_context;
use crate::output;

fn status_cell(status: &str) -> Cell {
    match status {
        "pass" => Cell::new("PASS").fg(Color::Green),
        "warning" => Cell::new("WARN").fg(Color::Yellow),
        "error" => Cell::new("ERROR").fg(Color::Red),
        other => Cell::new(other),
    }
}

/// Render one finding as "key: value" pairs
fn describe_detail(value: &Value) -> String {
    let Value::Object(map) = value else {
        return value.to_string();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(key, v)| match v {
            Value::String(s) => format!("{}: {}", key, s),
            other => format!("{}: {}", key, other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run(verbose: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let report = ctx.doctor_service.run_checks()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Store Health Check".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Check", "Status", "Message"]);
    for (name, check) in &report.checks {
        table.add_row(vec![
            Cell::new(name),
            status_cell(&check.status),
            Cell::new(&check.message),
        ]);
    }
    println!("{}", table);

    if verbose {
        for (name, check) in &report.checks {
            let Some(details) = &check.details else { continue };
            println!();
            println!("{}", name.as_str().bold());
            for detail in details {
                println!("  - {}", describe_detail(detail));
            }
        }
    }

    println!();
    println!(
        "Summary: {} passed, {} warnings, {} errors",
        report.summary.passed.to_string().green(),
        report.summary.warnings.to_string().yellow(),
        report.summary.errors.to_string().red(),
    );

    if !verbose && (report.summary.warnings > 0 || report.summary.errors > 0) {
        output::warning("Run with --verbose for details");
    }

    if report.summary.errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
