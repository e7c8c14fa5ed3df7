//! Core data models for the inventory service.
//!
//! Tenants and attachments map to host tables via `sqlx::FromRow`; inventory
//! entries are the JSON rows handed to the admin console.

pub mod attachment;
pub mod inventory;
pub mod tenant;
