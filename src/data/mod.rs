pub mod rating_repository;
pub mod store_repository;
pub mod user_repository;
