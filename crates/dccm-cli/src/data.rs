use crate::error::{CliError, Result};
use crate::utils::parser::{self, DatasetName};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const REPLICA_DIR_PREFIX: &str = "Rep_";
const DATASET_FILE_PREFIX: &str = "dccm_data_";
const DATASET_FILE_SUFFIX: &str = ".bin";

/// Locates stored DCCM datasets under a data root laid out as
/// `<system>/Rep_<replica>/dccm_data_<window>.bin`.
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        let path_str = path.to_str().ok_or_else(|| {
            CliError::Argument(format!("Data path is not valid UTF-8: {}", path.display()))
        })?;
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path_str).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    pub fn resolve_logical_name(&self, name: &DatasetName) -> PathBuf {
        self.base_path.join(name.relative_path())
    }

    /// Resolves a CLI dataset argument, which is either a path or a logical name.
    pub fn resolve_dataset(&self, name_or_path: &str) -> Result<PathBuf> {
        let path = Path::new(name_or_path);
        if parser::looks_like_path(name_or_path) {
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Provided path does not exist: {}", name_or_path),
                )));
            }
            return Ok(path.to_path_buf());
        }

        let parsed: DatasetName = name_or_path
            .parse()
            .map_err(|e: parser::ParseError| CliError::Argument(e.to_string()))?;
        let resolved = self.resolve_logical_name(&parsed);
        if !resolved.exists() {
            return Err(CliError::Data(format!(
                "Dataset '{}' resolves to {:?}, which does not exist.\nHint: Run 'dccm data list' to see the available datasets.",
                parsed, resolved
            )));
        }
        Ok(resolved)
    }

    /// Every dataset stored under the data root, sorted by name.
    pub fn list_datasets(&self) -> Result<Vec<DatasetName>> {
        if !self.base_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for system in subdirectories(&self.base_path)? {
            let Some(system_name) = file_name(&system) else {
                continue;
            };
            if system_name.starts_with('.') {
                continue;
            }
            for replica in subdirectories(&system)? {
                let Some(replica_id) = file_name(&replica)
                    .and_then(|n| n.strip_prefix(REPLICA_DIR_PREFIX).map(str::to_string))
                else {
                    continue;
                };
                for entry in fs::read_dir(&replica)? {
                    let entry = entry?;
                    let Some(window) = entry.file_name().to_str().and_then(parse_window) else {
                        continue;
                    };
                    names.push(DatasetName {
                        system: system_name.clone(),
                        replica: replica_id.clone(),
                        window,
                    });
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                let custom_path_str = fs::read_to_string(&config_path)?.trim().to_string();
                if custom_path_str.is_empty() {
                    warn!("Custom path config file is empty, falling back to default path.");
                    Self::get_default_data_path()
                } else {
                    Ok(PathBuf::from(custom_path_str))
                }
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "dccm-viewer", "dccmview")
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("path.conf"))
            .ok_or_else(|| CliError::Data("Could not determine config directory path.".to_string()))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CliError::Data("Could not determine default data directory path.".to_string())
            })
    }
}

fn subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_string)
}

fn parse_window(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(DATASET_FILE_PREFIX)?
        .strip_suffix(DATASET_FILE_SUFFIX)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn resolve_logical_name_constructs_replica_path() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());

        let name: DatasetName = "mc1r@2:50".parse().unwrap();
        assert_eq!(
            manager.resolve_logical_name(&name),
            temp_dir.path().join("mc1r/Rep_2/dccm_data_50.bin")
        );
    }

    #[test]
    fn resolve_dataset_accepts_existing_paths_and_names() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path();
        let stored = base.join("WT/Rep_1/dccm_data_25.bin");
        touch(&stored);
        let manager = DataManager::with_custom_path(base.to_path_buf());

        assert_eq!(manager.resolve_dataset("WT@1:25").unwrap(), stored);
        assert_eq!(
            manager.resolve_dataset(stored.to_str().unwrap()).unwrap(),
            stored
        );
    }

    #[test]
    fn resolve_dataset_reports_missing_targets() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());

        assert!(matches!(
            manager.resolve_dataset("WT@1:25"),
            Err(CliError::Data(_))
        ));
        assert!(matches!(
            manager.resolve_dataset("missing/dccm_data_25.bin"),
            Err(CliError::Io(_))
        ));
        assert!(matches!(
            manager.resolve_dataset("WT@1:zero"),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn list_datasets_walks_systems_and_replicas() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path();
        touch(&base.join("WT/Rep_1/dccm_data_25.bin"));
        touch(&base.join("WT/Rep_1/dccm_data_100.bin"));
        touch(&base.join("WT/Rep_2/dccm_data_25.bin"));
        touch(&base.join("WT/Rep_2/traj_CA.xtc"));
        touch(&base.join("WT/notes/dccm_data_25.bin"));
        touch(&base.join("D294H/Rep_1/dccm_data_50.bin"));
        touch(&base.join(".cache/Rep_1/dccm_data_50.bin"));

        let manager = DataManager::with_custom_path(base.to_path_buf());
        let names: Vec<String> = manager
            .list_datasets()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            names,
            vec!["D294H@1:50", "WT@1:25", "WT@1:100", "WT@2:25"]
        );
    }

    #[test]
    fn list_datasets_on_missing_root_is_empty() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().join("nope"));
        assert!(manager.list_datasets().unwrap().is_empty());
    }
}
