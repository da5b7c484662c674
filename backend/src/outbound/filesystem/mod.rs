//! Filesystem adapters backed by `cap-std` capability directories.
//!
//! [`CapStdWorkspace`] serves both the migration source read by the runner
//! and the model/migration workspace written by the generator.

mod cap_std_workspace;

pub use cap_std_workspace::CapStdWorkspace;
