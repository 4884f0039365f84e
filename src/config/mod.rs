//! Settings for the converter and CLI.
//!
//! Settings are read from `.pipeline-template/settings.yml` under the
//! project root, or from an explicit `--settings` path. Command-line flags
//! override file values.
//!
//! # Example
//!
//! ```
//! use pipeline_template::config::{discover_settings, SETTINGS_DIR, SETTINGS_FILE};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(SETTINGS_DIR);
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join(SETTINGS_FILE), "lookup_timeout_secs: 5").unwrap();
//!
//! let settings = discover_settings(temp.path()).unwrap();
//! assert_eq!(settings.lookup_timeout_secs, Some(5));
//! ```

pub mod settings;

pub use settings::{
    discover_settings, load_settings, parse_settings, settings_path, EngineSettings, Settings,
    SETTINGS_DIR, SETTINGS_FILE,
};
