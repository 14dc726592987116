//! Command handlers

pub mod animal;
pub mod config;
pub mod status;
