pub mod admin;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod owner;
pub mod response;
pub mod routes;
pub mod users;
