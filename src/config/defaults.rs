use std::path::PathBuf;

pub fn default_history_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".cache").join("chatsync").join("history"))
        .unwrap_or_else(|| PathBuf::from(".chatsync").join("history"))
}

pub fn default_persist() -> bool {
    false
}

pub fn default_log_filter(verbose: bool) -> String {
    if verbose {
        "info".to_string()
    } else {
        "warn".to_string()
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
