pub mod error;
pub mod query;
pub mod rating;
pub mod repository;
pub mod stats;
pub mod store;
pub mod user;
pub mod validation;
