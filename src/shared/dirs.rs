use std::path::PathBuf;

/// Application directory name under the XDG config root.
const APP_DIR: &str = "ghops";

/// Returns the user's home directory from the HOME environment variable.
pub fn home_dir() -> Option<PathBuf> {
    non_empty_env("HOME").map(PathBuf::from)
}

/// Returns the ghops config directory (`$XDG_CONFIG_HOME/ghops` or `~/.config/ghops`).
/// Empty values are treated as unset per XDG Base Directory Specification.
pub fn app_config_dir() -> Option<PathBuf> {
    let root = match non_empty_env("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => home_dir()?.join(".config"),
    };
    Some(root.join(APP_DIR))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
