//! Controladores: validan, autorizan y coordinan repositorios y servicios

pub mod auth_controller;
pub mod gallery_controller;
pub mod image_controller;
pub mod stats_controller;
pub mod vehicle_controller;
pub mod wishlist_controller;
