use std::path::PathBuf;

use snafu::Snafu;

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// A selected printer is absent from the live CUPS directory. Reported
    /// per item; never aborts the rest of a batch.
    #[snafu(display("printer '{name}' not found"))]
    NotFound { name: String },

    /// The name filters matched nothing. `checked` lists the name-list files
    /// consulted, when any were.
    #[snafu(display("no printers matched {filters}"))]
    EmptySelection {
        filters: String,
        checked: Option<String>,
    },

    #[snafu(display("print service: {message}"))]
    Service { message: String },

    #[snafu(display("configuration: {what}"))]
    Config { what: String },

    #[snafu(display("could not read {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("could not serialize the status board: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("mail relay refused the notification: {source}"))]
    Mail {
        source: lettre::transport::smtp::Error,
    },
}

impl Error {
    /// Wrap a failure from the service boundary, flattening the context
    /// chain into a single line.
    pub fn service(err: anyhow::Error) -> Self {
        Error::Service {
            message: format!("{err:#}"),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
