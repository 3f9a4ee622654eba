use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, ensure, Context, Result};
use chrono::DateTime;
use ipp::prelude::*;
use url::Url;

use super::models::{Job, Printer, QueueState};
use crate::config::models::Cups;

/// Capability surface of the print service consumed by the pipeline. Kept as
/// a trait so the status and action stages can be driven by a fake in tests.
pub trait PrintService {
    /// Enumerate every queue known to the server.
    fn printers(&self) -> Result<Vec<Printer>>;
    /// Enumerate the ids of the not-yet-completed jobs on the server.
    fn job_ids(&self) -> Result<Vec<i32>>;
    /// Fetch the full record for one job.
    fn job(&self, job_id: i32) -> Result<Job>;
    /// Submit a file to the named queue under the given job title.
    fn print_file(&self, printer: &str, path: &Path, job_name: &str) -> Result<()>;
    /// Cancel one job by id.
    fn cancel_job(&self, job_id: i32) -> Result<()>;
}

pub struct CupsClient {
    base: Url,
    ignore_tls_errors: bool,
}

impl CupsClient {
    pub fn new(settings: &Cups) -> Result<Self> {
        let mut base = Url::parse(&settings.uri)
            .with_context(|| format!("invalid CUPS uri '{}'", settings.uri))?;
        if !settings.username.is_empty() && !settings.password.is_empty() {
            base.set_username(&settings.username)
                .map_err(|_| anyhow!("cannot embed credentials in '{}'", settings.uri))?;
            base.set_password(Some(&settings.password))
                .map_err(|_| anyhow!("cannot embed credentials in '{}'", settings.uri))?;
        }
        Ok(CupsClient {
            base,
            ignore_tls_errors: settings.ignore_tls_errors,
        })
    }

    fn printer_uri(&self, queue: &str) -> Result<Url> {
        self.base
            .join("printers/")
            .and_then(|url| url.join(queue))
            .with_context(|| format!("cannot build a printer uri for '{queue}'"))
    }

    /// Send an IPP request to do `op` against `uri` and get the response.
    fn send_ipp_request(&self, uri: &Url, op: Operation) -> Result<IppRequestResponse> {
        let uri_p: Uri = uri.as_str().parse()?;
        let req = IppRequestResponse::new(IppVersion::v1_1(), op, Some(uri_p.clone()));
        let client = IppClient::builder(uri_p)
            .ignore_tls_errors(self.ignore_tls_errors)
            .build();
        let resp = client.send(req);
        Ok(resp?)
    }

    /// Send an IPP request to do `op` to job `job_id` against `uri` and get
    /// the response.
    fn send_ipp_job_request(
        &self,
        uri: &Url,
        op: Operation,
        job_id: i32,
    ) -> Result<IppRequestResponse> {
        let uri_p: Uri = uri.as_str().parse()?;
        let mut req = IppRequestResponse::new(IppVersion::v1_1(), op, Some(uri_p.clone()));
        req.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(job_id)),
        );

        let client = IppClient::builder(uri_p)
            .ignore_tls_errors(self.ignore_tls_errors)
            .build();
        let resp = client.send(req);
        Ok(resp?)
    }
}

impl PrintService for CupsClient {
    fn printers(&self) -> Result<Vec<Printer>> {
        let resp = self.send_ipp_request(&self.base, Operation::CupsGetPrinters)?;
        let mut vec: Vec<Printer> = Vec::new();

        for group in resp.attributes().groups_of(DelimiterTag::PrinterAttributes) {
            vec.push(parse_printer(group.attributes())?);
        }

        Ok(vec)
    }

    fn job_ids(&self) -> Result<Vec<i32>> {
        let resp = self.send_ipp_request(&self.base, Operation::GetJobs)?;
        let mut ids: Vec<i32> = Vec::new();

        for group in resp.attributes().groups_of(DelimiterTag::JobAttributes) {
            let id = group
                .attributes()
                .get("job-id")
                .and_then(|attr| attr.value().as_integer())
                .context("job group without a job-id")?;
            ids.push(*id);
        }

        Ok(ids)
    }

    fn job(&self, job_id: i32) -> Result<Job> {
        let resp = self.send_ipp_job_request(&self.base, Operation::GetJobAttributes, job_id)?;

        let group = resp
            .attributes()
            .groups_of(DelimiterTag::JobAttributes)
            .next()
            .context("invalid group returned")?;

        parse_job(job_id, group.attributes())
    }

    fn print_file(&self, printer: &str, path: &Path, job_name: &str) -> Result<()> {
        let uri = self.printer_uri(printer)?;
        let uri_p: Uri = uri.as_str().parse()?;

        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let print_job = IppOperationBuilder::print_job(uri_p.clone(), IppPayload::new(file))
            .job_title(job_name);

        let client = IppClient::builder(uri_p)
            .ignore_tls_errors(self.ignore_tls_errors)
            .build();
        let resp = client.send(print_job.build())?;
        let status = resp.header().status_code();
        ensure!(status.is_success(), "print request rejected: {status:?}");
        Ok(())
    }

    fn cancel_job(&self, job_id: i32) -> Result<()> {
        let resp = self.send_ipp_job_request(&self.base, Operation::CancelJob, job_id)?;
        let status = resp.header().status_code();
        ensure!(status.is_success(), "cancel rejected: {status:?}");
        Ok(())
    }
}

fn parse_printer(attrs: &HashMap<String, IppAttribute>) -> Result<Printer> {
    let name = text_attr(attrs, "printer-name").context("printer group without a printer-name")?;
    let state = attrs
        .get("printer-state")
        .and_then(|attr| attr.value().as_enum())
        .and_then(|v| PrinterState::from_i32(*v))
        .map(QueueState::from)
        .unwrap_or(QueueState::Idle);
    let mut state_reasons = keyword_list(attrs, "printer-state-reasons");
    if state_reasons.is_empty() {
        state_reasons.push("none".to_string());
    }

    Ok(Printer {
        name,
        location: text_attr(attrs, "printer-location").unwrap_or_default(),
        make_and_model: text_attr(attrs, "printer-make-and-model").unwrap_or_default(),
        state_message: text_attr(attrs, "printer-state-message").filter(|s| !s.is_empty()),
        state_reasons,
        state,
        job_count: attrs
            .get("queued-job-count")
            .and_then(|attr| attr.value().as_integer())
            .copied()
            .unwrap_or(0),
    })
}

fn parse_job(job_id: i32, attrs: &HashMap<String, IppAttribute>) -> Result<Job> {
    let printer_uri = text_attr(attrs, "job-printer-uri")
        .with_context(|| format!("job {job_id} has no job-printer-uri"))?;

    // Not every job seems to have a name
    let name = text_attr(attrs, "job-name").unwrap_or_default();

    let created = attrs
        .get("time-at-creation")
        .and_then(|attr| attr.value().as_integer())
        .and_then(|secs| DateTime::from_timestamp(*secs as i64, 0))
        .unwrap_or(DateTime::UNIX_EPOCH);

    Ok(Job {
        id: job_id,
        printer: printer_from_uri(&printer_uri)?,
        user: text_attr(attrs, "job-originating-user-name").unwrap_or_default(),
        name,
        state_reasons: keyword_list(attrs, "job-state-reasons"),
        printer_state_message: text_attr(attrs, "job-printer-state-message")
            .filter(|s| !s.is_empty()),
        created,
    })
}

/// The owning queue name is the final path segment of the job's printer URI.
pub(crate) fn printer_from_uri(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("invalid job-printer-uri '{raw}'"))?;
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .with_context(|| format!("job-printer-uri '{raw}' has no queue name"))
}

fn text_attr(attrs: &HashMap<String, IppAttribute>, name: &str) -> Option<String> {
    attrs.get(name).map(|attr| attr.value().to_string())
}

/// CUPS reports reason lists either as a single keyword or as an array.
fn keyword_list(attrs: &HashMap<String, IppAttribute>, name: &str) -> Vec<String> {
    match attrs.get(name).map(|attr| attr.value()) {
        Some(IppValue::Array(items)) => items.iter().map(|item| item.to_string()).collect(),
        Some(value) => vec![value.to_string()],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::printer_from_uri;

    #[test]
    fn queue_name_is_the_last_uri_segment() {
        let name = printer_from_uri("ipp://cups.example.org:631/printers/fab1").unwrap();
        assert_eq!(name, "fab1");
    }

    #[test]
    fn uri_without_a_path_is_rejected() {
        assert!(printer_from_uri("not a uri").is_err());
        assert!(printer_from_uri("ipp://cups.example.org:631/").is_err());
    }
}
