//! Download-to-disk and clipboard collaborators.

use crate::error::{GenError, Result};
use crate::extract::{extension_for_mime, parse_data_uri};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[async_trait]
pub trait ImageSaver: Send + Sync {
    /// Persists the image behind `url` and returns where it was written.
    async fn save_binary_as_file(&self, url: &str, suggested_name: &str) -> Result<PathBuf>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_text_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Writes images into a directory. `data:` URIs are decoded locally, other
/// URLs are downloaded.
pub struct DirectorySaver {
    dir: PathBuf,
    http: reqwest::Client,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn fetch(&self, url: &str) -> Result<(String, Vec<u8>)> {
        if url.starts_with("data:") {
            return parse_data_uri(url)
                .ok_or_else(|| GenError::ValidationError("Malformed data URI".into()));
        }

        log::info!("Downloading image from {}", url);
        let response = self.http.get(url).send().await?.error_for_status()?;
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .unwrap_or_else(|| mime_from_url(url).to_string());
        let bytes = response.bytes().await?;
        Ok((mime_type, bytes.to_vec()))
    }
}

fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    match path.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

/// Keeps a file name to characters safe on every platform.
fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if stem.is_empty() {
        "generated-image".to_string()
    } else {
        stem
    }
}

#[async_trait]
impl ImageSaver for DirectorySaver {
    async fn save_binary_as_file(&self, url: &str, suggested_name: &str) -> Result<PathBuf> {
        let (mime_type, bytes) = self.fetch(url).await?;
        let file_name = format!(
            "{}.{}",
            sanitize_file_stem(suggested_name),
            extension_for_mime(&mime_type)
        );

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;

        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Clipboard stand-in that writes copied text to any writer, e.g. stdout.
pub struct WriterClipboard<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterClipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Clipboard for WriterClipboard<W> {
    async fn copy_text_to_clipboard(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenError::ValidationError("Nothing to copy".into()));
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| GenError::IoError("clipboard writer poisoned".into()))?;
        writeln!(writer, "{}", text)?;
        writer.flush()?;
        Ok(())
    }
}
