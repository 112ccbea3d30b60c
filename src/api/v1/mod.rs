//! API Version 1 endpoints
//!
//! The clip trigger, the public clip listing and the admin channel registry.

pub mod admin;
pub mod clips;
pub mod routes;
