//! Infrastructure layer (adapters/implementations).
//!
//! This module contains the IO-bound parts: the SQLite store and the
//! configuration file.

pub mod app_config;
pub mod db;
