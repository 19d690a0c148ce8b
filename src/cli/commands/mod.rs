//! CLI command modules

pub mod generate;
pub mod info;
pub mod init;
pub mod pattern;
pub mod validate;
