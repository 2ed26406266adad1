//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir holds settings + secrets):
//!   Windows: %APPDATA%\ottoman-converter\
//!   macOS:   ~/Library/Application Support/ottoman-converter/
//!   Linux:   ~/.config/ottoman-converter/
//!
//! The bundled knowledgebase is looked up next to the running executable.

use std::path::PathBuf;

/// File name of the reference document shipped alongside the binary.
pub const BUNDLED_KNOWLEDGEBASE: &str = "ottoman.pdf";

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `secrets.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `secrets.toml`.
    pub secrets_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "ottoman-converter";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self::in_dir(config_dir)
    }

    /// Lay out the files under an explicit directory (useful for tests).
    pub fn in_dir(config_dir: PathBuf) -> Self {
        let settings_file = config_dir.join("settings.toml");
        let secrets_file = config_dir.join("secrets.toml");

        Self {
            config_dir,
            settings_file,
            secrets_file,
        }
    }

    /// `ottoman.pdf` in the directory of the running executable, if the
    /// executable path can be determined.
    pub fn bundled_knowledgebase() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(BUNDLED_KNOWLEDGEBASE))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
