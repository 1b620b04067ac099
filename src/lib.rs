pub mod config;
pub mod error;
pub mod handlers;
pub mod ics_import;
pub mod image_relay;
pub mod shutdown;
pub mod startup;
