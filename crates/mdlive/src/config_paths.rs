//! Configuration paths for mdlive
//!
//! All files live under:
//! - Unix/macOS: `$XDG_CONFIG_HOME/mdlive/` or `~/.config/mdlive/`
//! - Windows: `%APPDATA%\mdlive\`

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "mdlive";

/// Base config directory, `None` when no home directory is known.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        config_dir_from(env::var_os("XDG_CONFIG_HOME").map(PathBuf::from), dirs::home_dir())
    }
}

#[cfg_attr(target_os = "windows", allow(dead_code))]
fn config_dir_from(xdg: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    xdg.filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))
        .map(|config| config.join(APP_DIR))
}

/// `~/.config/mdlive/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/mdlive/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Creates the logs directory when missing.
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no config directory available")
    })?;
    ensure_dir(&logs)?;
    Ok(logs)
}

fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let dir = config_dir_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, Some(PathBuf::from("/xdg/mdlive")));
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let dir = config_dir_from(Some("rel".into()), Some("/home/u".into()));
        assert_eq!(dir, Some(PathBuf::from("/home/u/.config/mdlive")));
    }

    #[test]
    fn no_home_no_dir() {
        assert_eq!(config_dir_from(None, None), None);
    }
}
