pub mod collect;
pub mod config;
pub mod label;
pub mod render;
pub mod shell;
