//! Test infrastructure for the persistence layer.
//!
//! Fixtures build valid DTOs; [`FailingIndex`] is a search index that can be
//! switched off to exercise deferred mirroring.

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
