//! Typed client for the clinic booking REST API.
//!
//! The remote API exposes three endpoints under
//! `/booking-page/{store}/stores/{store}/`:
//!
//! - `GET  services` — catalog of bookable services
//! - `GET  providers?serviceId=<id>` — staff who perform a service
//! - `POST availability` — free slots for a date range and id sets
//!
//! This crate owns the wire formats, the projection into the reduced DTOs
//! the agent works with, and the availability aggregator that flattens the
//! remote's nested day → window → parallel-array response into per-slot
//! records. Failures are explicit [`error::BookingError`] values; callers
//! decide how to phrase them.

pub mod client;
pub mod error;
pub mod model;

pub use client::BookingClient;
pub use error::BookingError;
pub use model::{AvailabilityQuery, AvailabilitySlot, Provider, Service};
