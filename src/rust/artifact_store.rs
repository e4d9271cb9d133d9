use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{Categorizer, CategorizerError};

const MODEL_FILE: &str = "model.json";
const CHECKSUM_FILE: &str = "model.sha256";

/// A directory of named model artifacts, each stored with a SHA-256 sidecar.
///
/// Layout: `<root>/<name>/model.json` and `<root>/<name>/model.sha256`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    models_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store at the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("EXPENSE_CATEGORIZER_HOME") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("expense-categorizer").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir
                .join(".local")
                .join("share")
                .join("expense-categorizer")
                .join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("expense-categorizer").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self { models_dir })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_artifact_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join(MODEL_FILE)
    }

    pub fn get_checksum_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join(CHECKSUM_FILE)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.get_artifact_path(name).exists()
    }

    /// Saves `categorizer` under `name`, replacing any previous artifact.
    pub fn save(&self, name: &str, categorizer: &Categorizer) -> Result<PathBuf, CategorizerError> {
        validate_name(name)?;
        let bytes = categorizer.save()?;
        let hash = sha256_hex(&bytes);

        let model_path = self.get_artifact_path(name);
        log::info!("Saving artifact '{}' to {:?}", name, model_path);
        write_atomic(&model_path, &bytes)?;
        write_atomic(&self.get_checksum_path(name), hash.as_bytes())?;
        log::info!("Saved {} bytes (sha256 {})", bytes.len(), hash);
        Ok(model_path)
    }

    /// Loads the artifact stored under `name`.
    ///
    /// # Errors
    /// `ArtifactNotFound` if no such artifact exists; `ArtifactCorrupt` if the
    /// checksum does not match or the contents do not decode.
    pub fn load(&self, name: &str) -> Result<Categorizer, CategorizerError> {
        validate_name(name)?;
        let model_path = self.get_artifact_path(name);
        let bytes = read_artifact(&model_path)?;

        match self.read_checksum(name)? {
            Some(expected) => {
                let actual = sha256_hex(&bytes);
                if actual != expected {
                    log::error!(
                        "Artifact '{}' hash mismatch: expected {}, got {}",
                        name,
                        expected,
                        actual
                    );
                    return Err(CategorizerError::ArtifactCorrupt(format!(
                        "Hash mismatch for '{}': expected {}, got {}",
                        name, expected, actual
                    )));
                }
            }
            None => log::warn!("No checksum stored for artifact '{}', skipping verification", name),
        }

        let categorizer = Categorizer::load(&bytes)?;
        log::info!("Loaded artifact '{}' from {:?}", name, model_path);
        Ok(categorizer)
    }

    /// Whether the stored artifact matches its checksum. Missing files verify as `false`.
    pub fn verify(&self, name: &str) -> Result<bool, CategorizerError> {
        let model_path = self.get_artifact_path(name);
        if !model_path.exists() {
            log::info!("Artifact {:?} does not exist", model_path);
            return Ok(false);
        }
        let Some(expected) = self.read_checksum(name)? else {
            return Ok(false);
        };
        let bytes = fs::read(&model_path)?;
        Ok(sha256_hex(&bytes) == expected)
    }

    pub fn remove(&self, name: &str) -> Result<(), CategorizerError> {
        validate_name(name)?;
        let dir = self.models_dir.join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
            log::info!("Removed artifact '{}'", name);
        }
        Ok(())
    }

    /// Names of stored artifacts, sorted.
    pub fn list(&self) -> Result<Vec<String>, CategorizerError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.models_dir)? {
            let entry = entry?;
            if entry.path().join(MODEL_FILE).exists() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_checksum(&self, name: &str) -> Result<Option<String>, CategorizerError> {
        match fs::read_to_string(self.get_checksum_path(name)) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_name(name: &str) -> Result<(), CategorizerError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if invalid {
        return Err(CategorizerError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid artifact name '{}'", name),
        )));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, CategorizerError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CategorizerError::ArtifactNotFound(path.display().to_string()),
        _ => CategorizerError::Io(e),
    })
}

/// Writes `bytes` to a sibling temp file and renames it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)
}
