use std::fs;

use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use log::warn;
use snafu::ResultExt;

use crate::config::models::Mail;
use crate::error::{Error, IoSnafu, MailSnafu, Result};

/// The fixed variable set every header template is interpolated with.
pub struct MailVars<'a> {
    /// The user who submitted the cancelled job.
    pub user: &'a str,
    /// The local account running catpig.
    pub me: &'a str,
    pub job: &'a str,
    pub printer: &'a str,
}

pub fn interpolate(template: &str, vars: &MailVars) -> String {
    template
        .replace("{user}", vars.user)
        .replace("{me}", vars.me)
        .replace("{job}", vars.job)
        .replace("{printer}", vars.printer)
}

/// Render the notification for one cancelled job. Fails with a configuration
/// error when the body file or a required header (To, From, Subject) is
/// missing; an unreadable signature only logs a warning and the notice goes
/// out without it.
pub fn compose(mail: &Mail, vars: &MailVars) -> Result<Message> {
    let message_cfg = mail.message.as_ref().ok_or_else(|| Error::Config {
        what: "mail.message (body file) is not configured".to_string(),
    })?;
    let to = required(&mail.headers.to, "To", vars)?;
    let sender = required(&mail.headers.sender, "From", vars)?;
    let subject = required(&mail.headers.subject, "Subject", vars)?;

    let body = fs::read_to_string(&message_cfg.body).context(IoSnafu {
        path: message_cfg.body.clone(),
    })?;
    let body = match &message_cfg.signature {
        Some(path) => match fs::read_to_string(path) {
            Ok(signature) => format!("{}\n\n{signature}", body.trim_end()),
            Err(err) => {
                warn!(
                    "could not read signature {}: {err}; sending without it",
                    path.display()
                );
                body
            }
        },
        None => body,
    };

    let mut builder = Message::builder()
        .from(mailbox(&sender, "From")?)
        .to(mailbox(&to, "To")?)
        .subject(subject);
    if let Some(cc) = &mail.headers.cc {
        builder = builder.cc(mailbox(&interpolate(cc, vars), "Cc")?);
    }
    if let Some(bcc) = &mail.headers.bcc {
        builder = builder.bcc(mailbox(&interpolate(bcc, vars), "Bcc")?);
    }

    builder.body(body).map_err(|err| Error::Config {
        what: format!("could not assemble the notification: {err}"),
    })
}

/// One synchronous handoff to the local relay. No retries; acceptance by the
/// relay is the only delivery confirmation there is.
pub fn send(mail: &Mail, message: &Message) -> Result<()> {
    let mailer = SmtpTransport::builder_dangerous(&mail.relay)
        .port(mail.port)
        .build();
    mailer.send(message).context(MailSnafu)?;
    Ok(())
}

fn required(value: &Option<String>, name: &str, vars: &MailVars) -> Result<String> {
    match value {
        Some(template) => Ok(interpolate(template, vars)),
        None => Err(Error::Config {
            what: format!("mail.headers is missing the required {name} header"),
        }),
    }
}

fn mailbox(rendered: &str, header: &str) -> Result<Mailbox> {
    rendered.parse().map_err(|err| Error::Config {
        what: format!("{header} header '{rendered}' is not a valid address: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::config::models::{MailHeaders, MailMessage};

    const VARS: MailVars<'static> = MailVars {
        user: "alice",
        me: "operator",
        job: "thesis.pdf",
        printer: "fab1",
    };

    fn mail_with(body_dir: &std::path::Path, headers: MailHeaders) -> Mail {
        let body = body_dir.join("body.txt");
        fs::write(&body, "Your print job was cancelled.\n").unwrap();
        Mail {
            relay: "localhost".to_string(),
            port: 25,
            message: Some(MailMessage {
                body,
                signature: None,
            }),
            headers,
        }
    }

    fn full_headers() -> MailHeaders {
        MailHeaders {
            to: Some("{user}@example.org".to_string()),
            sender: Some("printers@example.org".to_string()),
            subject: Some("Job {job} on {printer} cancelled by {me}".to_string()),
            cc: None,
            bcc: None,
        }
    }

    #[test]
    fn templates_interpolate_the_fixed_variable_set() {
        let rendered = interpolate("{user}/{me}/{job}/{printer}", &VARS);
        assert_eq!(rendered, "alice/operator/thesis.pdf/fab1");
    }

    #[test]
    fn composed_message_carries_the_interpolated_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mail = mail_with(dir.path(), full_headers());

        let message = compose(&mail, &VARS).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("To: alice@example.org"));
        assert!(rendered.contains("Subject: Job thesis.pdf on fab1 cancelled by operator"));
        assert!(rendered.contains("Your print job was cancelled."));
    }

    #[test]
    fn a_missing_required_header_names_itself() {
        let dir = tempfile::tempdir().unwrap();
        let mut headers = full_headers();
        headers.subject = None;
        let mail = mail_with(dir.path(), headers);

        let err = compose(&mail, &VARS).unwrap_err();
        match err {
            Error::Config { what } => assert!(what.contains("Subject"), "got: {what}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn signature_is_appended_after_a_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut mail = mail_with(dir.path(), full_headers());
        let signature = dir.path().join("sig.txt");
        fs::write(&signature, "-- \nThe print team\n").unwrap();
        mail.message.as_mut().unwrap().signature = Some(signature);

        let message = compose(&mail, &VARS).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Your print job was cancelled.\r\n\r\n-- "));
    }

    #[test]
    fn an_unreadable_signature_degrades_to_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut mail = mail_with(dir.path(), full_headers());
        mail.message.as_mut().unwrap().signature = Some(PathBuf::from("/nonexistent/sig.txt"));

        let message = compose(&mail, &VARS).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Your print job was cancelled."));
    }

    #[test]
    fn a_missing_body_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut mail = mail_with(dir.path(), full_headers());
        mail.message.as_mut().unwrap().body = PathBuf::from("/nonexistent/body.txt");

        let err = compose(&mail, &VARS).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "got: {err}");
    }
}

