use std::collections::HashMap;

use convert_case::{Case, Casing};
use serde_derive::Serialize;

use crate::cups_client::models::{Job, Printer};
use crate::cups_client::PrintService;
use crate::error::{Error, Result};
use crate::resolver::Selection;

pub mod report;

/// Suffix words dropped from the end of a state-reason code before display.
const DROPPED_SUFFIXES: [&str; 2] = ["warning", "report"];

/// Make a state-reason code a little tidier-looking: strip one trailing
/// suffix word from DROPPED_SUFFIXES, then title-case the hyphen-delimited
/// words. Applying it to an already-pretty string is a no-op.
pub fn pretty_string(reason: &str) -> String {
    let stripped = match reason.rsplit_once('-') {
        Some((head, tail)) if DROPPED_SUFFIXES.contains(&tail) => head,
        _ => reason,
    };
    stripped.to_case(Case::Title)
}

/// Job state-reason codes carry a fixed "job-" category prefix on the wire
/// ("job-printing", "job-completed-successfully"). Drop it before tidying; a
/// reason without the prefix passes through unchanged.
pub fn pretty_job_reason(reason: &str) -> String {
    pretty_string(reason.strip_prefix("job-").unwrap_or(reason))
}

/// Everything the views and actions need, aggregated once per invocation:
/// the full printer directory and the queued jobs keyed by queue name.
#[derive(Debug, Default, Serialize)]
pub struct StatusBoard {
    pub printers: HashMap<String, Printer>,
    pub jobs_by_printer: HashMap<String, Vec<Job>>,
}

impl StatusBoard {
    /// Fetch every job record and sort it under its owning printer. Every
    /// known printer gets an entry, queued or not; a job naming an unknown
    /// printer is kept under that name so it can still be shown.
    pub fn collect(printers: Vec<Printer>, service: &dyn PrintService) -> Result<Self> {
        let mut board = StatusBoard::default();
        for printer in printers {
            board.jobs_by_printer.insert(printer.name.clone(), Vec::new());
            board.printers.insert(printer.name.clone(), printer);
        }

        for job_id in service.job_ids().map_err(Error::service)? {
            let job = service.job(job_id).map_err(Error::service)?;
            board
                .jobs_by_printer
                .entry(job.printer.clone())
                .or_default()
                .push(job);
        }

        Ok(board)
    }

    pub fn printer(&self, name: &str) -> Option<&Printer> {
        self.printers.get(name)
    }

    pub fn jobs(&self, name: &str) -> &[Job] {
        self.jobs_by_printer
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_alert(&self, name: &str) -> bool {
        self.printer(name).is_some_and(Printer::has_alert)
    }

    pub fn has_queue(&self, name: &str) -> bool {
        !self.jobs(name).is_empty()
    }
}

/// Narrow a selection to printers that have an alert or a queue. When both
/// views are requested the union is kept, not the intersection.
pub fn apply_view_filter(selection: &mut Selection, board: &StatusBoard, alerts: bool, jobs: bool) {
    for group in &mut selection.groups {
        group
            .names
            .retain(|name| (jobs && board.has_queue(name)) || (alerts && board.has_alert(name)));
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::cups_client::models::QueueState;
    use crate::resolver::NameList;

    fn printer(name: &str, reasons: &[&str]) -> Printer {
        Printer {
            name: name.to_string(),
            location: "Basement".to_string(),
            make_and_model: "Example LaserWriter".to_string(),
            state_message: None,
            state_reasons: reasons.iter().map(|r| r.to_string()).collect(),
            state: QueueState::Idle,
            job_count: 0,
        }
    }

    fn job(id: i32, printer: &str) -> Job {
        Job {
            id,
            printer: printer.to_string(),
            user: "alice".to_string(),
            name: format!("doc-{id}"),
            state_reasons: vec!["job-printing".to_string()],
            printer_state_message: None,
            created: DateTime::UNIX_EPOCH,
        }
    }

    struct Canned {
        printers: Vec<Printer>,
        jobs: Vec<Job>,
    }

    impl PrintService for Canned {
        fn printers(&self) -> anyhow::Result<Vec<Printer>> {
            Ok(self.printers.clone())
        }

        fn job_ids(&self) -> anyhow::Result<Vec<i32>> {
            Ok(self.jobs.iter().map(|job| job.id).collect())
        }

        fn job(&self, job_id: i32) -> anyhow::Result<Job> {
            self.jobs
                .iter()
                .find(|job| job.id == job_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no job {job_id}"))
        }

        fn print_file(
            &self,
            _printer: &str,
            _path: &std::path::Path,
            _job_name: &str,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        fn cancel_job(&self, _job_id: i32) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn board_with(printers: Vec<Printer>, jobs: Vec<Job>) -> StatusBoard {
        let service = Canned {
            printers: printers.clone(),
            jobs,
        };
        StatusBoard::collect(printers, &service).unwrap()
    }

    #[test]
    fn pretty_string_strips_one_suffix_and_title_cases() {
        assert_eq!(pretty_string("media-empty-warning"), "Media Empty");
        assert_eq!(pretty_string("toner-low-report"), "Toner Low");
        assert_eq!(pretty_string("offline"), "Offline");
        // Only the final segment is a suffix, and only one is stripped.
        assert_eq!(pretty_string("warning-warning"), "Warning");
        assert_eq!(pretty_string("none"), "None");
    }

    #[test]
    fn pretty_string_is_idempotent() {
        for raw in ["media-empty-warning", "cover-open", "none", "offline-report"] {
            let once = pretty_string(raw);
            assert_eq!(pretty_string(&once), once);
        }
    }

    #[test]
    fn job_reasons_lose_their_category_prefix() {
        assert_eq!(pretty_job_reason("job-printing"), "Printing");
        assert_eq!(pretty_job_reason("job-hold-until-specified"), "Hold Until Specified");
        // Without the prefix the reason is tidied as-is.
        assert_eq!(pretty_job_reason("printing"), "Printing");
    }

    #[test]
    fn none_sentinel_is_not_an_alert() {
        assert!(!printer("fab1", &["none"]).has_alert());
        assert!(printer("fab2", &["media-empty-warning"]).has_alert());
        assert!(printer("fab3", &["cover-open", "none"]).has_alert());
    }

    #[test]
    fn every_printer_has_a_job_sequence_and_every_job_one_printer() {
        let board = board_with(
            vec![printer("fab1", &["none"]), printer("fab2", &["none"])],
            vec![job(1, "fab2"), job(2, "fab2"), job(3, "ghost")],
        );

        assert!(board.jobs("fab1").is_empty());
        assert_eq!(
            board.jobs("fab2").iter().map(|j| j.id).collect::<Vec<_>>(),
            [1, 2]
        );
        // A job naming an absent printer stays displayable under that name.
        assert_eq!(board.jobs("ghost").len(), 1);
        assert!(board.printer("ghost").is_none());
    }

    #[test]
    fn view_filter_keeps_the_union_of_alerting_and_queued() {
        let board = board_with(
            vec![
                printer("quiet", &["none"]),
                printer("alerting", &["media-empty-warning"]),
                printer("queued", &["none"]),
            ],
            vec![job(1, "queued")],
        );
        let mut selection = Selection {
            groups: vec![NameList {
                label: "cups".to_string(),
                names: vec![
                    "quiet".to_string(),
                    "alerting".to_string(),
                    "queued".to_string(),
                ],
            }],
            grouped: false,
            sources: Vec::new(),
        };

        apply_view_filter(&mut selection, &board, true, true);
        assert_eq!(
            selection.names().collect::<Vec<_>>(),
            ["alerting", "queued"]
        );
    }
}
