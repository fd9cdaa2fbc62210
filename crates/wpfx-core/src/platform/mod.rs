//! Platform abstraction layer.
//!
//! OS-specific behavior is kept behind this module:
//! - `paths` - home expansion and path normalization
//! - `process` - child detachment, window suppression and termination signals

pub mod paths;
pub mod process;

pub use paths::{file_exists, normalize_path};
pub use process::{configure_detached, request_termination};
