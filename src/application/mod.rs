pub mod admin_service;
pub mod auth_service;
pub mod owner_service;
pub mod store_service;
