//! Common test infrastructure for REST API tests.
//!
//! - [`harness`] - Test server over an in-memory store and a switchable index
//! - [`fixtures`] - JSON bodies for each entity

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
