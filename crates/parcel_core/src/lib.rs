//! Parcel tracking data-access layer.
//!
//! A thin repository over a single SQLite `parcel` table, plus the lifecycle
//! service and logging bootstrap used by the CLI.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{
    ClientId, Parcel, ParcelNumber, ParcelStatus, ParseParcelStatusError, UNASSIGNED_NUMBER,
};
pub use repo::parcel_repo::{ParcelRepository, RepoError, RepoResult, SqliteParcelRepository};
pub use service::parcel_service::ParcelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
