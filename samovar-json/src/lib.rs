use samovar_core::{CoreError, DeckStore};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub mod paths;

pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// One `<key>.json` file per learner, written atomically, with rotated
/// timestamped copies under `<backups>/<key>/`.
pub struct JsonFileStore {
    root: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
}

impl JsonFileStore {
    pub fn open_default() -> Result<Self, CoreError> {
        let (decks, backups) = paths::default_store_dirs();
        Self::open_with(decks, backups, DEFAULT_MAX_BACKUPS)
    }

    pub fn open_in(data_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let data_dir: PathBuf = data_dir.into();
        let (decks, backups) = paths::store_dirs(&data_dir);
        Self::open_with(decks, backups, DEFAULT_MAX_BACKUPS)
    }

    pub fn open_with(root: PathBuf, backups_dir: PathBuf, max_backups: usize) -> Result<Self, CoreError> {
        ensure_dir(&root)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            max_backups: max_backups.max(1),
        })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }

    pub fn backups_for(&self, key: &str) -> PathBuf {
        self.backups_dir.join(file_stem(key))
    }

    /// Keys that have a deck file, as file stems.
    pub fn keys(&self) -> Result<Vec<String>, CoreError> {
        let mut v: Vec<String> = fs::read_dir(&self.root)
            .map_err(storage)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        v.sort();
        Ok(v)
    }
}

/// Filesystem-safe stem for a learner key.
pub fn file_stem(key: &str) -> String {
    let stem: String = key
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "default".to_string()
    } else {
        stem
    }
}

fn storage(e: io::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(storage)
}

impl DeckStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "deck file unreadable");
                Err(storage(e))
            }
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), CoreError> {
        let path = self.path_for(key);
        let backups = self.backups_for(key);
        write_with_backup(&path, &backups, self.max_backups, payload.as_bytes()).map_err(storage)?;
        debug!(path = %path.display(), bytes = payload.len(), "deck saved");
        Ok(())
    }
}

fn write_with_backup(path: &Path, backups_dir: &Path, max_backups: usize, bytes: &[u8]) -> Result<(), io::Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    fs::create_dir_all(backups_dir)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("deck");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
    let backup_path = backups_dir.join(format!("{stem}-{ts}.json"));
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(bytes)?;
    btmp.flush()?;
    btmp.persist(&backup_path).map_err(|e| e.error)?;

    rotate_backups(backups_dir, max_backups)
}

/// Keeps the newest `keep` backups. Names embed the timestamp, so name order
/// is age order.
fn rotate_backups(dir: &Path, keep: usize) -> Result<(), io::Error> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort();
    if entries.len() > keep {
        for p in &entries[..entries.len() - keep] {
            let _ = fs::remove_file(p);
        }
    }
    Ok(())
}
