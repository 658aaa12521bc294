//! Services module
//!
//! Reglas de autorización y almacenamiento de las imágenes subidas.

pub mod authorization_service;
pub mod media_storage;
