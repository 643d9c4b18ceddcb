//! Controladores de la aplicación
//!
//! Orquestan stores y servicios para cada operación de la API. El
//! RentalController es la máquina de estados de reservas; el resto son
//! superficies finas sobre los stores.

pub mod admin_controller;
pub mod auth_controller;
pub mod profile_controller;
pub mod rental_controller;
pub mod report_controller;
pub mod search_controller;

pub use admin_controller::AdminController;
pub use auth_controller::AuthController;
pub use profile_controller::ProfileController;
pub use rental_controller::RentalController;
pub use report_controller::ReportController;
pub use search_controller::SearchController;
