//! Core data models for smb-shares

pub mod share;

pub use share::{ExportMode, SecurityMode, ShareRecord};
