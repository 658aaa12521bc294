//! Lectura de formularios multipart
//!
//! Recoge los campos de texto y los ficheros de un `Multipart` para que los
//! DTOs se construyan igual que desde JSON.

use axum::{body::Bytes, extract::Multipart};
use std::collections::HashMap;

use crate::utils::errors::{AppError, AppResult};

/// Fichero recibido en un campo del formulario
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Contenido completo de un formulario multipart
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: Vec<UploadedFile>,
}

impl FormData {
    /// Lee todo el formulario. Cada fichero se limita a `max_file_size` bytes.
    pub async fn read(mut multipart: Multipart, max_file_size: usize) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let bytes = field.bytes().await?;
                if bytes.len() > max_file_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File '{}' exceeds {} bytes",
                        file_name, max_file_size
                    )));
                }
                form.files.push(UploadedFile {
                    field: name,
                    file_name: Some(file_name),
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn insert_file(&mut self, name: &str, bytes: impl Into<Bytes>) {
        self.files.push(UploadedFile {
            field: name.to_string(),
            file_name: None,
            bytes: bytes.into(),
        });
    }

    /// Primer valor del campo, sin espacios; los valores vacíos cuentan como ausentes
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Todos los valores de un campo repetido
    pub fn texts(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn files(&self, name: &str) -> impl Iterator<Item = &UploadedFile> {
        let name = name.to_string();
        self.files.iter().filter(move |f| f.field == name)
    }

    /// Valor de un campo convertido con `FromStr`; un valor inválido es un error de validación
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Invalid value for '{}': '{}'", name, raw))),
        }
    }
}
