// src/pmc/mod.rs
pub mod client;
pub mod input;
pub mod models;
