pub mod access;
pub mod builds;
pub mod config;
pub mod org;
