//! Release layer: where the target Go version comes from
//!
//! - [`source`]: `ReleaseSource` trait and a pinned implementation
//! - [`go_dev`]: the go.dev download feed
//! - [`error`]: error types for release lookups
//! - [`types`]: `GoVersion` and the feed's wire types

pub mod error;
pub mod go_dev;
pub mod source;
pub mod types;

pub use error::ReleaseError;
pub use go_dev::GoDevReleaseSource;
pub use source::{PinnedRelease, ReleaseSource};
pub use types::GoVersion;
