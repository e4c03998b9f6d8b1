//! XDG base directory lookup.

use std::ffi::OsString;
use std::path::PathBuf;

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`; `None` if neither is set.
pub fn config_home() -> Option<PathBuf> {
    config_home_from(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
}

fn config_home_from(xdg: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    match xdg.filter(|v| !v.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home
            .filter(|v| !v.is_empty())
            .map(|home| PathBuf::from(home).join(".config")),
    }
}
