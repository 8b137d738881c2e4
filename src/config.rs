use crate::convert::ConversionMode;
use crate::error::{PrdrSnapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub directories: DirectoryConfig,
    pub conversion: ConversionConfig,
}

/// Last-used source and destination directories, persisted between runs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoryConfig {
    pub source_dir: Option<PathBuf>,
    pub destination_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    pub mode: ConversionMode,
    pub decode_check: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Extract,
            decode_check: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PrdrSnapError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PrdrSnapError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["prdrsnap.toml", ".prdrsnap.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref source) = cli_args.source_dir {
            self.directories.source_dir = Some(source.clone());
        }

        if let Some(ref destination) = cli_args.destination_dir {
            self.directories.destination_dir = Some(destination.clone());
        }

        if let Some(mode) = cli_args.mode {
            self.conversion.mode = mode;
        }

        if let Some(decode_check) = cli_args.decode_check {
            self.conversion.decode_check = decode_check;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| PrdrSnapError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| PrdrSnapError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    /// Source directory, required and existing, or a configuration error.
    pub fn require_source(&self) -> Result<&Path> {
        let source = self
            .directories
            .source_dir
            .as_deref()
            .ok_or_else(|| PrdrSnapError::Config {
                message: "No source directory selected".to_string(),
            })?;

        if !source.is_dir() {
            return Err(PrdrSnapError::Config {
                message: format!("Source directory does not exist: {}", source.display()),
            });
        }

        Ok(source)
    }

    /// Destination directory, required and existing, or a configuration error.
    pub fn require_destination(&self) -> Result<&Path> {
        let destination =
            self.directories
                .destination_dir
                .as_deref()
                .ok_or_else(|| PrdrSnapError::Config {
                    message: "No destination directory selected".to_string(),
                })?;

        if !destination.is_dir() {
            return Err(PrdrSnapError::Config {
                message: format!(
                    "Destination directory does not exist: {}",
                    destination.display()
                ),
            });
        }

        Ok(destination)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub source_dir: Option<PathBuf>,
    pub destination_dir: Option<PathBuf>,
    pub mode: Option<ConversionMode>,
    pub decode_check: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_dir(mut self, source: Option<PathBuf>) -> Self {
        self.source_dir = source;
        self
    }

    pub fn with_destination_dir(mut self, destination: Option<PathBuf>) -> Self {
        self.destination_dir = destination;
        self
    }

    pub fn with_mode(mut self, mode: Option<ConversionMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_decode_check(mut self, decode_check: Option<bool>) -> Self {
        self.decode_check = decode_check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.directories.source_dir.is_none());
        assert!(config.directories.destination_dir.is_none());
        assert_eq!(config.conversion.mode, ConversionMode::Extract);
        assert!(config.conversion.decode_check);
    }

    #[test]
    fn test_config_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("prdrsnap.toml");

        let mut config = Config::default();
        config.directories.source_dir = Some(PathBuf::from("/tmp/profiles"));
        config.conversion.mode = ConversionMode::Copy;

        config.save_to_file(&config_path).unwrap();
        let loaded = Config::load_from_file(&config_path).unwrap();

        assert_eq!(
            loaded.directories.source_dir,
            Some(PathBuf::from("/tmp/profiles"))
        );
        assert_eq!(loaded.conversion.mode, ConversionMode::Copy);
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_file(temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(PrdrSnapError::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[directories\nsource_dir = ???").unwrap();

        let result = Config::load_from_file(&config_path);
        assert!(matches!(result, Err(PrdrSnapError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_source_dir(Some(PathBuf::from("/src")))
            .with_destination_dir(Some(PathBuf::from("/dst")))
            .with_mode(Some(ConversionMode::Copy))
            .with_decode_check(Some(false));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.directories.source_dir, Some(PathBuf::from("/src")));
        assert_eq!(
            config.directories.destination_dir,
            Some(PathBuf::from("/dst"))
        );
        assert_eq!(config.conversion.mode, ConversionMode::Copy);
        assert!(!config.conversion.decode_check);
    }

    #[test]
    fn test_require_directories() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();

        assert!(config.require_source().is_err());
        assert!(config.require_destination().is_err());

        config.directories.source_dir = Some(temp_dir.path().join("gone"));
        assert!(config.require_source().is_err());

        config.directories.source_dir = Some(temp_dir.path().to_path_buf());
        config.directories.destination_dir = Some(temp_dir.path().to_path_buf());
        assert!(config.require_source().is_ok());
        assert!(config.require_destination().is_ok());
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[directories]"));
        assert!(sample.contains("[conversion]"));
    }
}
