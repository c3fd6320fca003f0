//! Server message channel

pub mod handler;
pub mod protocol;
