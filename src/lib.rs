pub mod app;
pub mod apply;
pub mod config;
pub mod decoding;
pub mod shared;
pub mod version;
