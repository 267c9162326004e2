//! services/api/src/lib.rs
//!
//! The MentorSphere API service: storage adapters, domain operations and the
//! axum web layer. The `api` binary wires these together at startup.

pub mod adapters;
pub mod config;
pub mod credentials;
pub mod error;
pub mod operations;
pub mod web;
