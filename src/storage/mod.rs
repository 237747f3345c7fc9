use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec;
use crate::drawing::Drawing;

const APP_DIR: &str = "chartmark";
const DRAWINGS_SUBDIR: &str = "drawings";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("neither XDG_DATA_HOME nor HOME is set")]
    MissingHomeDirectory,
    #[error("storage key is empty")]
    EmptyKey,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize drawings: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Somewhere a chart's drawings can be kept between sessions, addressed by a
/// host-chosen key (typically symbol plus layout).
pub trait DrawingRepository {
    fn load(&self, key: &str) -> StorageResult<Vec<Drawing>>;
    fn save(&self, key: &str, drawings: &[Drawing]) -> StorageResult<()>;
}

/// One JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    pub const fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn with_default_paths() -> StorageResult<Self> {
        let xdg_data_home = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from);
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let root = drawings_dir(xdg_data_home.as_deref(), home.as_deref())?;
        fs::create_dir_all(&root)?;
        Ok(Self::with_root(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for_key(&self, key: &str) -> StorageResult<PathBuf> {
        if key.trim().is_empty() {
            return Err(StorageError::EmptyKey);
        }
        let mut path = self.root.clone();
        path.push(format!("{}.json", sanitize_key(key)));
        Ok(path)
    }

    pub fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for_key(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err)),
        }
    }
}

impl DrawingRepository for FileRepository {
    /// A missing file is an empty chart. A file that is not valid JSON also
    /// loads as empty, with a warning, and individual bad records are skipped.
    fn load(&self, key: &str) -> StorageResult<Vec<Drawing>> {
        let path = self.path_for_key(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::Io(err)),
        };
        let drawings = codec::decode_str(&contents);
        tracing::debug!(path = %path.display(), count = drawings.len(), "drawings loaded");
        Ok(drawings)
    }

    fn save(&self, key: &str, drawings: &[Drawing]) -> StorageResult<()> {
        let path = self.path_for_key(key)?;
        let contents = serde_json::to_string_pretty(&codec::encode(drawings))?;
        write_replacing(&path, contents.as_bytes()).inspect_err(|err| {
            tracing::warn!(path = %path.display(), ?err, "failed to save drawings");
        })?;
        tracing::debug!(path = %path.display(), count = drawings.len(), "drawings saved");
        Ok(())
    }
}

fn drawings_dir(xdg_data_home: Option<&Path>, home: Option<&Path>) -> StorageResult<PathBuf> {
    let mut path = match xdg_data_home.filter(|path| !path.as_os_str().is_empty()) {
        Some(xdg) => xdg.to_path_buf(),
        None => home
            .ok_or(StorageError::MissingHomeDirectory)?
            .join(".local/share"),
    };
    path.push(APP_DIR);
    path.push(DRAWINGS_SUBDIR);
    Ok(path)
}

/// Keeps keys to one safe path component.
fn sanitize_key(key: &str) -> String {
    let sanitized = key
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

fn write_replacing(destination: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp = destination.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);
    fs::write(&temp, contents)?;
    fs::rename(&temp, destination).inspect_err(|_| {
        let _ = fs::remove_file(&temp);
    })
}
