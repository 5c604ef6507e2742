//! Storage layer for smb-shares
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod shares;

pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use shares::{find_share_index, ShareStore};
