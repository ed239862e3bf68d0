pub mod handlers;
pub mod models;
pub mod stats;
pub mod store;
