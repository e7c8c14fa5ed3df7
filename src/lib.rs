//! Network-wide document inventory for multi-tenant content platforms.
//!
//! Scans one tenant at a time for attachments of a single document type and
//! serves the result as sortable JSON rows or a CSV export.

pub mod auth;
pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
