//! Solar land marketplace backend.
//!
//! Hexagonal layout: `domain` holds the aggregates, lifecycle services,
//! and ports; `outbound` implements the driven ports (PostgreSQL and
//! in-memory); `api` exposes the driving ports over HTTP; `server` wires
//! the graph together.

pub mod api;
pub mod doc;
pub mod domain;
pub mod outbound;
pub mod server;
