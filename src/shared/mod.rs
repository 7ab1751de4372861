pub mod config;
pub mod dirs;
pub mod env_file;
pub mod env_var;
pub mod logging;
pub mod poll;
pub mod table;
pub mod time;
