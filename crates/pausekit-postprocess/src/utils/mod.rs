//! Utility modules

pub mod file_io;
