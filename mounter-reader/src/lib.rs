//! # mounter-reader
//!
//! Readers that build a [`MountingPoint`](mounter_core::MountingPoint) from
//! a source: the CMS API through an [`ApiClient`], or a site directory.
//!
//! Both sources validate their configuration before reading anything and
//! run through the same [`Runner`], which enforces ingestion order and
//! resolves entry relationships once every entry is known.

pub mod api;
pub mod config;
pub mod error;
pub mod file_system;
pub mod reader;
pub mod runner;

pub use api::{ApiClient, ApiReader, MemoryClient};
pub use config::{ApiCredentials, ReaderConfig};
pub use error::{api_err, ReaderError};
pub use file_system::FileSystemReader;
pub use reader::{ReadContext, ResourceReader};
pub use runner::Runner;
