//! Shared integration test utilities
#![allow(dead_code)]

pub mod release;
pub mod repo;

pub use release::{StaticReleaseSource, mock_release_feed};
pub use repo::TestRepo;
