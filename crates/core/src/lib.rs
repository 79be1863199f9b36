//! Core of the website generator: the content document model, the
//! section merge-patch engine, ownership checks and the storage boundary.

pub mod access;
pub mod document;
pub mod error;
pub mod events;
pub mod generate;
pub mod mutation;
pub mod service;
pub mod store;

pub use error::{WebsiteError, WebsiteResult};
pub use service::WebsiteService;
