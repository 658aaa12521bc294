//! Extractores de Axum con rechazo tipado
//!
//! Envuelven los extractores estándar para que cualquier rechazo se
//! convierta en `AppError` y salga con el cuerpo de error estructurado.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::{
    dto::FromForm,
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        multipart::FormData,
    },
};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Cuerpo JSON o `multipart/form-data` todavía sin interpretar.
///
/// Los controladores lo convierten con [`Payload::into_request`] después de
/// cargar el recurso y autorizar, así un cuerpo inválido nunca oculta un
/// 403 o un 404.
pub enum Payload {
    Json(Bytes),
    Form {
        multipart: Multipart,
        max_file_size: usize,
    },
    Unsupported,
}

impl Payload {
    /// Request y ficheros subidos en `file_field`; JSON no trae ficheros
    pub async fn into_request<T>(self, file_field: &str) -> AppResult<(T, Vec<Bytes>)>
    where
        T: DeserializeOwned + FromForm,
    {
        match self {
            Payload::Json(body) => {
                let request = serde_json::from_slice(&body).map_err(|e| {
                    AppError::BadRequest(format!("Failed to deserialize the JSON body: {}", e))
                })?;
                Ok((request, Vec::new()))
            }
            Payload::Form {
                multipart,
                max_file_size,
            } => {
                let form = FormData::read(multipart, max_file_size).await?;
                let files = form.files(file_field).map(|file| file.bytes.clone()).collect();
                Ok((T::from_form(&form)?, files))
            }
            Payload::Unsupported => Err(AppError::BadRequest(
                "Expected a body with `Content-Type: application/json` or `multipart/form-data`"
                    .to_string(),
            )),
        }
    }
}

fn request_content_type(request: &Request) -> &str {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn is_multipart(content_type: &str) -> bool {
    content_type.starts_with("multipart/form-data")
}

/// `application/json` o cualquier `application/*+json`
fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[async_trait]
impl FromRequest<AppState> for Payload {
    type Rejection = AppError;

    async fn from_request(request: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = request_content_type(&request).to_string();

        if is_multipart(&content_type) {
            let multipart = Multipart::from_request(request, state).await?;
            Ok(Payload::Form {
                multipart,
                max_file_size: state.media.max_file_size(),
            })
        } else if is_json(&content_type) {
            let body = Bytes::from_request(request, state).await?;
            Ok(Payload::Json(body))
        } else {
            Ok(Payload::Unsupported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::image_dto::AttachImageRequest;

    #[test]
    fn test_content_type_detection() {
        assert!(is_json("application/json"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(is_json("application/problem+json"));
        assert!(!is_json("text/plain"));
        assert!(!is_json(""));
        assert!(is_multipart("multipart/form-data; boundary=xyz"));
        assert!(!is_multipart("application/json"));
    }

    #[tokio::test]
    async fn test_json_payload_is_parsed_on_demand() {
        let payload = Payload::Json(Bytes::from_static(
            br#"{"image_url": "https://cdn.example.com/golf.jpg", "is_primary": true}"#,
        ));
        let (request, files): (AttachImageRequest, _) = payload.into_request("image").await.unwrap();
        assert_eq!(request.image_url.as_deref(), Some("https://cdn.example.com/golf.jpg"));
        assert!(request.is_primary);
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_and_unsupported_bodies_are_bad_requests() {
        let payload = Payload::Json(Bytes::from_static(b"{\"is_primary\": "));
        let err = payload.into_request::<AttachImageRequest>("image").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = Payload::Unsupported
            .into_request::<AttachImageRequest>("image")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
