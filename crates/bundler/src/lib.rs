//! Archive builder: turns one export job into one checksummed zip bundle.
//!
//! The builder stages every artifact in an exclusive temporary working
//! directory, packages it through the [`Packager`] seam, and copies the
//! archive into the durable output directory. The working directory is
//! removed on every exit path, success or failure.

pub mod builder;
pub mod error;
pub mod packager;

pub use builder::{BuildArtifact, BuilderConfig, BundleBuilder};
pub use error::BuildError;
pub use packager::{Packager, PackagerError, ZipPackager};
