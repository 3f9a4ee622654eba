use serde_derive::Serialize;
use snafu::ResultExt;

use super::{pretty_job_reason, pretty_string, StatusBoard};
use crate::cups_client::models::{Job, Printer};
use crate::error::{JsonSnafu, Result};
use crate::resolver::Selection;

/// One-line summary of a printer's status: a queue marker, an alert marker,
/// the name, then either the location or the pretty alert list.
pub fn print_summary_line(board: &StatusBoard, name: &str, alerts: bool, jobs: bool) {
    let Some(printer) = board.printer(name) else {
        println!("XX {name}\tNOT FOUND");
        return;
    };

    let queue = if board.has_queue(name) { 'j' } else { ' ' };
    let alert = if printer.has_alert() { '!' } else { ' ' };
    let info = if alerts {
        printer
            .state_reasons
            .iter()
            .map(|reason| pretty_string(reason))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        printer.location.clone()
    };
    println!("{queue}{alert} {name}\t{info}");

    if jobs {
        for job in board.jobs(name) {
            println!("   . {}", job_line(job));
        }
    }
}

/// Detailed information about a printer's status, including its jobs.
pub fn print_details(board: &StatusBoard, name: &str) {
    println!("Printer Name:\t{name}");
    let Some(printer) = board.printer(name) else {
        println!("Location:\tNOT FOUND\n");
        return;
    };
    println!("Location:\t{}", printer.location);
    println!("Model:\t\t{}", printer.make_and_model);
    println!("State:\t\t{:?}", printer.state);

    if let Some(message) = &printer.state_message {
        println!("Status:\t\t{message}");
    }
    if printer.has_alert() {
        let mut reasons = printer.state_reasons.iter();
        if let Some(first) = reasons.next() {
            println!("Messages:\t{}", pretty_string(first));
        }
        for reason in reasons {
            println!("\t\t{}", pretty_string(reason));
        }
    }

    let queued = board.jobs(name);
    if let Some((first, rest)) = queued.split_first() {
        println!("Jobs:\t\t{}", job_line(first));
        for job in rest {
            println!("\t\t{}", job_line(job));
        }
    }
    println!();
}

fn job_line(job: &Job) -> String {
    let status = job
        .state_reasons
        .first()
        .map(|reason| pretty_job_reason(reason))
        .unwrap_or_default();
    let status = match &job.printer_state_message {
        Some(message) => format!("{status} ({message})"),
        None => status,
    };
    format!("{}  {} ({}) -- {}", job.id, job.name, job.user, status)
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    printer: Option<&'a Printer>,
    alert: bool,
    queued: bool,
    jobs: &'a [Job],
}

/// Dump the selected slice of the status board as JSON. Printers missing
/// from the live directory appear with a null-free entry: no printer record,
/// both markers false, plus whatever jobs still reference them.
pub fn print_json(board: &StatusBoard, selection: &Selection) -> Result<()> {
    let entries: Vec<JsonEntry> = selection
        .names()
        .map(|name| JsonEntry {
            name,
            printer: board.printer(name),
            alert: board.has_alert(name),
            queued: board.has_queue(name),
            jobs: board.jobs(name),
        })
        .collect();

    let rendered = serde_json::to_string_pretty(&entries).context(JsonSnafu)?;
    println!("{rendered}");
    Ok(())
}
