//! Parcel lifecycle service.
//!
//! # Responsibility
//! - Register parcels with a creation timestamp.
//! - Advance status along `registered -> sent -> delivered`.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Service layer remains storage-agnostic.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoResult};
use chrono::{SecondsFormat, Utc};
use log::info;

/// Use-case service wrapper for parcel tracking.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel stamped with the current UTC time.
    ///
    /// Returns the stored parcel including its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let mut parcel = Parcel::new(client, address, current_timestamp());
        parcel.number = self.repo.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, client
        );
        Ok(parcel)
    }

    /// Moves a parcel one step forward in its lifecycle.
    ///
    /// Returns the new status, or `None` when the parcel is already delivered.
    pub fn next_status(&self, number: ParcelNumber) -> RepoResult<Option<ParcelStatus>> {
        let parcel = self.repo.get(number)?;
        let Some(next) = parcel.status.next() else {
            info!(
                "event=parcel_next_status module=service status=skipped number={number} reason=delivered"
            );
            return Ok(None);
        };

        self.repo.set_status(number, next)?;
        info!(
            "event=parcel_next_status module=service status=ok number={} from={} to={}",
            number, parcel.status, next
        );
        Ok(Some(next))
    }

    /// Changes the address. No-op unless the parcel is still registered.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.repo.set_address(number, address)
    }

    /// Deletes the parcel. No-op unless the parcel is still registered.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.delete(number)
    }

    /// Fetches one parcel, failing with `NotFound` when missing.
    pub fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.repo.get(number)
    }

    /// Lists every parcel of a client.
    pub fn client_parcels(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.repo.get_by_client(client)
    }
}

fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
