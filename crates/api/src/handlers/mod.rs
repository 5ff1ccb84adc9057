//! HTTP request handlers

pub mod breeds;
pub mod health;
