//! Domain layer: validation rules, the directory and the query service.

pub mod directory;
pub mod service;
pub mod validation;

pub use directory::{Directory, DirectoryBuildError};
pub use service::{Service, status_for};
