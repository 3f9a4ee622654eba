use chrono::{DateTime, Utc};
use ipp::model::PrinterState;
use serde_derive::Serialize;

/// Serializable mirror of the IPP printer-state enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueueState {
    Idle,
    Processing,
    Stopped,
}

impl From<PrinterState> for QueueState {
    fn from(state: PrinterState) -> Self {
        match state {
            PrinterState::Idle => QueueState::Idle,
            PrinterState::Processing => QueueState::Processing,
            PrinterState::Stopped => QueueState::Stopped,
        }
    }
}

/// One print queue as reported by CUPS-Get-Printers.
#[derive(Debug, Clone, Serialize)]
pub struct Printer {
    pub name: String,
    pub location: String,
    pub make_and_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_message: Option<String>,
    /// Never empty; the single element "none" means no active condition.
    pub state_reasons: Vec<String>,
    pub state: QueueState,
    pub job_count: i32,
}

impl Printer {
    /// A printer is alerting when its leading state reason is anything other
    /// than the "none" sentinel, regardless of what follows.
    pub fn has_alert(&self) -> bool {
        self.state_reasons.first().map(String::as_str) != Some("none")
    }
}

/// One queued job, as reported by Get-Job-Attributes.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: i32,
    /// Owning queue, taken from the final path segment of the job's printer
    /// URI. May name a printer that is absent from the current directory.
    pub printer: String,
    pub user: String,
    pub name: String,
    pub state_reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_state_message: Option<String>,
    pub created: DateTime<Utc>,
}
