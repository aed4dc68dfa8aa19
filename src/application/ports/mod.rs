// src/application/ports/mod.rs
pub mod browser;
pub mod security;
pub mod time;

