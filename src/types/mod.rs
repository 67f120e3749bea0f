//! Core types shared by the provider, response and requester layers.

pub mod request;
pub mod streaming;

pub use request::*;
pub use streaming::*;
