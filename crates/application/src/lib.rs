//! Zonesync Application Layer
//!
//! Ports describing the collaborators of the secondary engine (zone transport,
//! persistence backends, the request chain) and the use cases that drive a
//! NOTIFY through probe, transfer and persistence.
pub mod ports;
pub mod use_cases;
