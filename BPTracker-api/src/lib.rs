// BPTracker-api lib.rs
//
// Loopback HTTP/JSON facade over the domain services, used by the UI shell.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
