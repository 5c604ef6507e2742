//! Share validation
//!
//! - `path`: canonical path resolution with containment in the allowed root
//! - `share`: field-level checks for a whole share definition

pub mod path;
pub mod share;

pub use path::resolve_path;
pub use share::{validate_share, ShareValidationError, ShareValidator};
