//! Almacenamiento de imágenes subidas
//!
//! Los ficheros recibidos por multipart se validan por sus bytes mágicos y se
//! guardan en `MEDIA_ROOT` con un nombre aleatorio. La base de datos solo
//! guarda la URL pública (`MEDIA_BASE_URL/<nombre>`).

use std::path::PathBuf;
use uuid::Uuid;

use crate::{config::EnvironmentConfig, utils::errors::AppError};

/// Tipos de imagen aceptados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Detecta el tipo por los primeros bytes del fichero
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageKind::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageKind::Png),
            [0x47, 0x49, 0x46, 0x38, ..] => Some(ImageKind::Gif),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
                Some(ImageKind::Webp)
            }
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
            ImageKind::Webp => "webp",
        }
    }
}

/// Almacén local de imágenes
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.media_root.clone(),
            config.media_base_url.clone(),
            config.media_max_file_size,
        )
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Valida y guarda una imagen; devuelve su URL pública
    pub async fn store(&self, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} bytes",
                self.max_file_size
            )));
        }
        let kind = ImageKind::detect(bytes).ok_or_else(|| {
            AppError::BadRequest("Unsupported file type. Allowed: JPEG, PNG, WebP, GIF".to_string())
        })?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;

        let filename = format!("{}.{}", Uuid::new_v4(), kind.extension());
        tokio::fs::write(self.root.join(&filename), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;

        tracing::debug!(%filename, size = bytes.len(), "🖼️ Imagen almacenada");
        Ok(format!("{}/{}", self.base_url, filename))
    }

    /// Guarda varias imágenes; si una falla, borra las ya guardadas
    pub async fn store_all<B: AsRef<[u8]>>(&self, files: &[B]) -> Result<Vec<String>, AppError> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            match self.store(file.as_ref()).await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    self.remove_all(&urls).await;
                    return Err(e);
                }
            }
        }
        Ok(urls)
    }

    /// Nombre de fichero local si la URL apunta a este almacén
    fn local_file_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        let safe = !name.is_empty()
            && !name.contains("..")
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains('\0');
        safe.then_some(name)
    }

    /// Borra el fichero local de una URL; las URLs externas se ignoran.
    /// Un fallo solo se registra, la fila ya se eliminó.
    pub async fn remove(&self, url: &str) {
        let Some(name) = self.local_file_name(url) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.root.join(name)).await {
            tracing::warn!(%url, error = %e, "No se pudo borrar el fichero de imagen");
        }
    }

    pub async fn remove_all(&self, urls: &[String]) {
        for url in urls {
            self.remove(url).await;
        }
    }
}
