//! SafeHaven - Support services for survivors of gender-based violence
//!
//! This crate implements anonymous incident reporting, an anonymous
//! community board and three AI-assisted tools (resource referral,
//! safe-location lookup and the ZindukaBot chat) behind an HTTP API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
