//! User configuration
//!
//! Stored in `~/.config/mdlive/config.yaml`. Every field is optional.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use mdlive_core::split::DEFAULT_RATIO;
use mdlive_markdown::MarkdownOptions;
use mdlive_markdown::document::FrameSize;
use serde::{Deserialize, Serialize};

use crate::cli::CliArgs;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Markdown syntax extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    pub gfm: bool,
    pub raw_html: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extensions: Extensions,
    /// `a4`, `letter` or `full`
    pub frame_size: FrameSize,
    /// Show the frame-size toggles in the header.
    pub frame_selector: bool,
    /// Editor share of the split in percent.
    pub initial_ratio: f64,
    /// Base for relative links and images.
    pub base_url: Option<String>,
    /// Where print documents are written; the system temp dir when unset.
    pub print_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extensions: Extensions::default(),
            frame_size: FrameSize::default(),
            frame_selector: true,
            initial_ratio: DEFAULT_RATIO,
            base_url: None,
            print_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `explicit` strictly, or the default config file leniently.
    ///
    /// A missing or broken default file yields defaults; an explicitly named one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        match Self::from_path(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if args.no_gfm {
            self.extensions.gfm = false;
        }
        if args.no_raw_html {
            self.extensions.raw_html = false;
        }
        if let Some(frame) = args.frame {
            self.frame_size = frame;
        }
        if let Some(ratio) = args.ratio {
            self.initial_ratio = ratio;
        }
        if let Some(dir) = &args.print_dir {
            self.print_dir = Some(dir.clone());
        }
        self
    }

    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            gfm: self.extensions.gfm,
            raw_html: self.extensions.raw_html,
            base_url: self.base_url.clone(),
        }
    }

    pub fn print_dir(&self) -> PathBuf {
        self.print_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("mdlive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config =
            AppConfig::from_yaml("extensions:\n  raw_html: false\nframe_size: letter\n").unwrap();
        assert!(config.extensions.gfm);
        assert!(!config.extensions.raw_html);
        assert_eq!(config.frame_size, FrameSize::Letter);
        assert!(config.frame_selector);
        assert_eq!(config.initial_ratio, 50.0);
    }

    #[test]
    fn full_file_round_trips_options() {
        let yaml = "extensions: { gfm: false, raw_html: true }\nframe_size: full\n\
                    frame_selector: false\ninitial_ratio: 30\n\
                    base_url: https://example.com/\nprint_dir: /tmp/prints\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.frame_size, FrameSize::FullWidth);
        assert!(!config.frame_selector);
        assert_eq!(config.initial_ratio, 30.0);
        assert_eq!(config.print_dir(), PathBuf::from("/tmp/prints"));
        let options = config.markdown_options();
        assert!(!options.gfm);
        assert!(options.raw_html);
        assert_eq!(options.base_url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn unknown_frame_is_rejected_at_load() {
        let err = AppConfig::from_yaml("frame_size: a3\n").unwrap_err();
        assert!(err.to_string().contains("a3"), "{err}");
    }

    #[test]
    fn frame_aliases_are_accepted() {
        for (value, frame) in [
            ("a4", FrameSize::A4),
            ("A4", FrameSize::A4),
            ("Letter", FrameSize::Letter),
            ("full", FrameSize::FullWidth),
            ("full-width", FrameSize::FullWidth),
            ("fullwidth", FrameSize::FullWidth),
        ] {
            let config = AppConfig::from_yaml(&format!("frame_size: {value}\n")).unwrap();
            assert_eq!(config.frame_size, frame, "{value}");
        }
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("extensions: [1, 2").is_err());
    }

    #[test]
    fn explicit_missing_file_is_read_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/mdlive/config.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cli_overrides_file_values() {
        let args = CliArgs {
            no_gfm: true,
            no_raw_html: true,
            frame: Some(FrameSize::FullWidth),
            ratio: Some(25.0),
            print_dir: Some(PathBuf::from("/out")),
            ..CliArgs::default()
        };
        let config = AppConfig::default().with_overrides(&args);
        assert!(!config.extensions.gfm);
        assert!(!config.extensions.raw_html);
        assert_eq!(config.frame_size, FrameSize::FullWidth);
        assert_eq!(config.initial_ratio, 25.0);
        assert_eq!(config.print_dir(), PathBuf::from("/out"));
    }

    #[test]
    fn missing_flags_leave_config_alone() {
        let config = AppConfig {
            frame_size: FrameSize::Letter,
            ..AppConfig::default()
        };
        let merged = config.clone().with_overrides(&CliArgs::default());
        assert_eq!(merged, config);
    }
}
