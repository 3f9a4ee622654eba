use std::path::Path;

use config::{Config, Environment, File};

use super::models::Settings;
use crate::error::{Error, Result};

/// Build the settings from the optional config file plus CATPIG_* environment
/// variables. A missing default config file is fine (everything has a
/// default); an explicitly requested file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(explicit) => File::from(explicit.to_path_buf()).required(true),
        None => File::from(super::base_dir().join("config.toml")).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::default()
                .prefix("CATPIG")
                .separator("_")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()
        .map_err(|err| Error::Config {
            what: err.to_string(),
        })?;

    config.try_deserialize().map_err(|err| Error::Config {
        what: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::models::MatchMode;

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[cups]
uri = "http://printhost:631/"

[behavior]
match_mode = "any"
not_found_exit_code = 2

[mail.headers]
to = "{{user}}@example.org"
"#
        )
        .unwrap();

        let settings = load_config(Some(file.path())).unwrap();
        assert_eq!(settings.cups.uri, "http://printhost:631/");
        assert_eq!(settings.behavior.match_mode, MatchMode::Any);
        assert_eq!(settings.behavior.not_found_exit_code, 2);
        assert_eq!(
            settings.mail.headers.to.as_deref(),
            Some("{user}@example.org")
        );
        // Untouched sections keep their defaults.
        assert_eq!(settings.mail.relay, "localhost");
        assert_eq!(settings.test_page.job_name, "CATPIG Test");
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/catpig.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
