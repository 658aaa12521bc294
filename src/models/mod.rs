//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod gallery;
pub mod stats;
pub mod user;
pub mod vehicle;
pub mod vehicle_image;
pub mod wishlist;
