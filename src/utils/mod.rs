//! Utilidades compartidas: errores, JWT, extractores, formularios y validación

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod multipart;
pub mod validation;
