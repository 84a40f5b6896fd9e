use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides the platform data directory when set.
pub const DATA_DIR_ENV: &str = "SAMOVAR_DATA_DIR";

/// `$SAMOVAR_DATA_DIR`, else the platform data dir, else the working directory.
pub fn data_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("com", "samovar", "Samovar")
        .map(|pd| pd.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Deck directory and backup directory under `root`.
pub fn store_dirs(root: &Path) -> (PathBuf, PathBuf) {
    (root.join("decks"), root.join("backups"))
}

pub fn default_store_dirs() -> (PathBuf, PathBuf) {
    store_dirs(&data_root())
}
