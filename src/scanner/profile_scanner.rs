use crate::error::{PrdrSnapError, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Profile files carry this literal name prefix.
pub const PROFILE_PREFIX: &str = "PRDR";

/// Relative path from the platform documents directory to the game's
/// profile root. Each user profile is a subdirectory underneath it.
pub const DEFAULT_PROFILE_SUFFIX: &[&str] = &["Rockstar Games", "Red Dead Redemption 2", "Profiles"];

#[derive(Debug, Clone)]
pub struct ProfileFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl ProfileFile {
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            filename,
            size,
            modified,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileScanner;

impl ProfileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Enumerate PRDR* files directly inside `dir`, sorted by filename.
    /// Subdirectories are not searched.
    pub fn scan_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<ProfileFile>> {
        let dir = dir.as_ref();

        if !dir.exists() {
            return Err(PrdrSnapError::InvalidPath {
                path: dir.display().to_string(),
            });
        }

        if !dir.is_dir() {
            return Err(PrdrSnapError::InvalidPath {
                path: format!("{} is not a directory", dir.display()),
            });
        }

        let mut profiles = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable entries are skipped; the caller decides whether
                // an empty result is an error.
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let matches_prefix = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(PROFILE_PREFIX));
            if !matches_prefix {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| match e.into_io_error() {
                Some(io) => PrdrSnapError::from_io(entry.path(), io),
                None => PrdrSnapError::InvalidPath {
                    path: entry.path().display().to_string(),
                },
            })?;
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            profiles.push(ProfileFile::new(
                entry.path().to_path_buf(),
                metadata.len(),
                modified,
            ));
        }

        profiles.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(profiles)
    }

    /// Locate the default profile directory: the documents folder plus the
    /// fixed game suffix, then the first subdirectory found there. Requires
    /// at least one PRDR* file inside the chosen subdirectory.
    pub fn detect_default_source(&self) -> Result<PathBuf> {
        let documents = dirs::document_dir().ok_or_else(|| PrdrSnapError::ProfileDirNotFound {
            path: "<documents directory unavailable>".to_string(),
        })?;

        let mut profile_root = documents;
        for component in DEFAULT_PROFILE_SUFFIX {
            profile_root.push(component);
        }

        self.pick_profile_subdirectory(&profile_root)
    }

    /// Testable half of `detect_default_source`: given the profile root,
    /// pick the first subdirectory containing profile files.
    pub fn pick_profile_subdirectory(&self, profile_root: &Path) -> Result<PathBuf> {
        if !profile_root.is_dir() {
            return Err(PrdrSnapError::ProfileDirNotFound {
                path: profile_root.display().to_string(),
            });
        }

        let mut subdirs: Vec<PathBuf> = std::fs::read_dir(profile_root)
            .map_err(|e| PrdrSnapError::from_io(profile_root, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.path())
            .collect();
        subdirs.sort();

        let profile_dir = subdirs
            .into_iter()
            .next()
            .ok_or_else(|| PrdrSnapError::ProfileDirNotFound {
                path: profile_root.display().to_string(),
            })?;

        let profiles = self.scan_directory(&profile_dir)?;
        if profiles.is_empty() {
            return Err(PrdrSnapError::NoProfilesFound {
                path: profile_dir.display().to_string(),
            });
        }

        Ok(profile_dir)
    }
}
