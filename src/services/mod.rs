pub mod byte_format;
pub mod content_store;
pub mod csv_export;
pub mod inventory_service;
pub mod tenant_context;
