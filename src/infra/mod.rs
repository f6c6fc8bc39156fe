//! Infrastructure layer (adapters/implementations).
//!
//! This module contains the IO-heavy pieces: SQLite storage, live queries
//! and the settings file.

pub mod app_config;
pub mod db;
