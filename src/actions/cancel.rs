use super::{mailer, mailer::MailVars, prompt};
use crate::config::models::Mail;
use crate::cups_client::models::Job;
use crate::cups_client::PrintService;
use crate::error::{Error, Result};

/// Cancel one queued job after confirmation, then offer to notify the job's
/// owner by email. A refusal from the service stops the flow before the
/// email gate; declining either gate aborts cleanly.
pub fn run(service: &dyn PrintService, mail: &Mail, job: &Job) -> Result<()> {
    let question = format!(
        "Cancelling job {} ({}) on {}. Confirm?",
        job.id, job.name, job.printer
    );
    if !prompt::confirm(&question) {
        println!("Aborted.");
        return Ok(());
    }

    service.cancel_job(job.id).map_err(Error::service)?;
    println!("Cancelled job {}.", job.id);

    if !prompt::confirm(&format!("Notify {} by email. Confirm?", job.user)) {
        println!("Not sending email.");
        return Ok(());
    }

    let me = local_user();
    let vars = MailVars {
        user: &job.user,
        me: &me,
        job: &job.name,
        printer: &job.printer,
    };
    let message = mailer::compose(mail, &vars)?;
    mailer::send(mail, &message)?;
    println!("Sent.");
    Ok(())
}

fn local_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
