//! Repository layer for parcel persistence.
//!
//! # Responsibility
//! - Define the parcel data-access contract.
//! - Keep SQLite query details out of service/CLI code.
//!
//! # Invariants
//! - Conditional writes (address, delete) are single statements; the status
//!   check and the mutation are never split across two round trips.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod parcel_repo;
