use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::info;
use tempfile::NamedTempFile;

use super::prompt;
use crate::config::models::TestPage;
use crate::cups_client::PrintService;

/// Send a disposable test page to one printer, after confirming. Fetch and
/// submit failures bubble up so a batch run can report them and carry on
/// with the next printer.
pub fn run(service: &dyn PrintService, settings: &TestPage, printer: &str) -> Result<()> {
    if !prompt::confirm(&format!("Sending test page to {printer}. Confirm?")) {
        println!("Aborted.");
        return Ok(());
    }

    info!("fetching test page data from {}", settings.source_url);
    let body = fetch_image(&settings.source_url)?;

    let mut file =
        NamedTempFile::new().context("creating a scratch file for the test page")?;
    file.write_all(&body).context("writing the test page data")?;
    file.flush().context("writing the test page data")?;

    info!("fetched {} bytes, printing", body.len());
    service.print_file(printer, file.path(), &settings.job_name)?;
    println!("Done.");
    Ok(())
}

/// Plain HTTP GET of the filler image; whatever bytes come back are accepted
/// as valid test-page content.
fn fetch_image(url: &str) -> Result<Vec<u8>> {
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("fetching {url}"))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .context("reading the test page data")?;
    Ok(bytes)
}
