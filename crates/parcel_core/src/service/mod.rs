//! Core use-case services.
//!
//! # Responsibility
//! - Drive the parcel lifecycle on top of repository calls.
//! - Keep CLI code decoupled from storage details.

pub mod parcel_service;
