//! Routers de la API

pub mod admin_routes;
pub mod auth_routes;
pub mod profile_routes;
pub mod rental_routes;
pub mod scooter_routes;
