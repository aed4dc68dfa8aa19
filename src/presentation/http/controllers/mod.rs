// src/presentation/http/controllers/mod.rs
pub mod audit;
pub mod auth;
pub mod records;
pub mod sync;
