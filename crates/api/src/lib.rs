//! Northloom API library.
//!
//! Exposes the whole application as a library so the CLI and integration
//! tests can reuse the config, repositories, and services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
