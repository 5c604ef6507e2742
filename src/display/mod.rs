//! Display formatting for terminal output

pub mod backup;
pub mod share;

pub use backup::{format_backup_list, format_size};
pub use share::{format_share_details, format_share_list};
