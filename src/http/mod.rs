//! HTTP boundary: JSON API plus the embedded dashboard page

pub mod handler;
pub mod server;

pub use server::{router, HttpServer};
