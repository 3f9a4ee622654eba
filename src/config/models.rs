use std::path::PathBuf;

use clap::ValueEnum;
use serde_derive::Deserialize;

// When changing anything here, make sure to add
// #[serde(alias = "ihavenounderscores")]
// where needed, so it can be read from the ENV vars.

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cups {
    pub uri: String,
    #[serde(alias = "ignoretlserrors")]
    pub ignore_tls_errors: bool,
    pub username: String,
    pub password: String,
}

impl Default for Cups {
    fn default() -> Self {
        Cups {
            uri: "http://localhost:631/".to_string(),
            ignore_tls_errors: true,
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Lists {
    /// Directory scanned for *.printers name-list files.
    pub dir: PathBuf,
}

impl Default for Lists {
    fn default() -> Self {
        Lists {
            dir: super::base_dir(),
        }
    }
}

/// Name filter semantics. The historical revisions of the tool disagreed on
/// whether multi-token filters were conjunctive or disjunctive, so the choice
/// is explicit here rather than baked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A printer is selected when its name contains every filter token.
    #[default]
    All,
    /// A printer is selected when its name contains at least one token.
    Any,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Behavior {
    #[serde(alias = "matchmode")]
    pub match_mode: MatchMode,
    /// Exit nonzero when the name filters match nothing.
    #[serde(alias = "emptyselectionfatal")]
    pub empty_selection_fatal: bool,
    /// Exit status to use when a selected printer is not known to CUPS.
    /// Zero keeps the historical "report inline, exit clean" behavior.
    #[serde(alias = "notfoundexitcode")]
    pub not_found_exit_code: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TestPage {
    #[serde(alias = "sourceurl")]
    pub source_url: String,
    #[serde(alias = "jobname")]
    pub job_name: String,
}

impl Default for TestPage {
    fn default() -> Self {
        TestPage {
            source_url: "http://www.lorempixel.com/800/600/animals".to_string(),
            job_name: "CATPIG Test".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Mail {
    pub relay: String,
    pub port: u16,
    pub message: Option<MailMessage>,
    pub headers: MailHeaders,
}

impl Default for Mail {
    fn default() -> Self {
        Mail {
            relay: "localhost".to_string(),
            port: 25,
            message: None,
            headers: MailHeaders::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MailMessage {
    /// File holding the notification body text.
    pub body: PathBuf,
    /// Optional signature file, appended after a blank line. Unreadable
    /// signatures degrade to a warning instead of aborting the send.
    pub signature: Option<PathBuf>,
}

/// Header templates for the cancellation notice. To, From and Subject are
/// required, Cc and Bcc optional. Every template may reference {user}, {me},
/// {job} and {printer}.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MailHeaders {
    #[serde(alias = "To")]
    pub to: Option<String>,
    #[serde(rename = "from", alias = "From")]
    pub sender: Option<String>,
    #[serde(alias = "Subject")]
    pub subject: Option<String>,
    #[serde(alias = "Cc", alias = "CC")]
    pub cc: Option<String>,
    #[serde(alias = "Bcc", alias = "BCC")]
    pub bcc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cups: Cups,
    pub lists: Lists,
    pub behavior: Behavior,
    #[serde(alias = "testpage")]
    pub test_page: TestPage,
    pub mail: Mail,
}
