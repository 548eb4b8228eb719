#![crate_type = "lib"]
#![crate_name = "gamedb"]

pub mod common;
pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod sql;
pub mod storage;
pub mod types;
