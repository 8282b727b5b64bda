// src/models/mod.rs

pub mod badge;
pub mod quiz;
pub mod result;
pub mod user;
