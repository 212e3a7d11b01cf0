// src/file_handler.rs
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rfd::FileDialog;
use tokio::task;

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The only declared MIME types a selection may carry. Validation checks
/// nothing but this declared type; the file contents are never inspected.
pub const ALLOWED_TYPES: [&str; 2] = [CSV_MIME, XLSX_MIME];

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum LoadError {
    Io(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "could not read file: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

pub fn is_allowed(mime: &str) -> bool {
    ALLOWED_TYPES.contains(&mime)
}

/// The MIME type a pick declares, derived from the path's extension the way
/// a browser file input would. Unknown extensions fall back to a generic
/// type, which the allow-list then rejects.
pub fn declared_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => CSV_MIME,
        Some("xlsx") => XLSX_MIME,
        _ => "application/octet-stream",
    }
}

/// Opens the native file dialog and loads the chosen file. The `.csv, .xlsx`
/// filter is advisory only; the real check happens against the declared
/// MIME type when the selection reaches the workflow. Returns `Ok(None)`
/// when the user cancels the dialog.
pub async fn pick_and_load() -> Result<Option<SelectedFile>, LoadError> {
    let picked = FileDialog::new()
        .add_filter("Spreadsheets", &["csv", "xlsx"])
        .pick_file();

    match picked {
        Some(path) => load(path).await.map(Some),
        None => Ok(None),
    }
}

pub async fn load(path: PathBuf) -> Result<SelectedFile, LoadError> {
    let mime = declared_mime(&path).to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let bytes = task::spawn_blocking(move || fs::read(&path))
        .await
        .map_err(|err| LoadError::Io(err.to_string()))?
        .map_err(|err| LoadError::Io(err.to_string()))?;

    Ok(SelectedFile { name, mime, bytes })
}
