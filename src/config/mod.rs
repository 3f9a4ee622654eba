use std::path::PathBuf;

pub mod loading;
pub mod models;

/// Directory holding the config file, name-list files and mail templates.
pub fn base_dir() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".catpig")
}
