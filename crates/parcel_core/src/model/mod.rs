//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define the canonical parcel record shared by store, service and CLI.
//!
//! # Invariants
//! - Every stored parcel is identified by a storage-assigned `ParcelNumber`.
//! - Address edits and deletion are only legal in `registered` status.

pub mod parcel;
