//! Persona profiles — models, store operations, and HTTP handlers.

pub mod handlers;
pub mod models;
pub mod store;
