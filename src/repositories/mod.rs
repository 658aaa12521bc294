//! Acceso a PostgreSQL

pub mod gallery_repository;
pub mod session_repository;
pub mod stats_repository;
pub mod user_repository;
pub mod vehicle_image_repository;
pub mod vehicle_repository;
pub mod wishlist_repository;
