use std::path::PathBuf;

const APP_DIR: &str = "estate";

#[cfg(not(target_os = "windows"))]
pub fn home_dir() -> PathBuf {
    std::env::var("HOME").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

#[cfg(target_os = "windows")]
pub fn home_dir() -> PathBuf {
    std::env::var("USERPROFILE").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

pub fn config_dir() -> PathBuf {
    let config_dir =
        std::env::var("XDG_CONFIG_HOME").map_or_else(|_| home_dir().join(".config"), PathBuf::from);
    config_dir.join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map_or_else(|_| home_dir().join(".local").join("share"), PathBuf::from);
    data_dir.join(APP_DIR)
}

/// Shortens a secret for log output.
pub fn redact(value: &str) -> String {
    let head: String = value.chars().take(6).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_only_a_prefix() {
        assert_eq!(redact("abcdefghijkl"), "abcdef...");
        assert_eq!(redact("abc"), "abc...");
    }
}
