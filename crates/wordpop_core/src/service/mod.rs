//! Use-case services built on top of the storage layer.

pub mod csv;
pub mod export_service;
pub mod save_service;
