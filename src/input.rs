//! Parsed inputs: the integration's documents and the host's shared strings.

pub mod shared;
pub mod translation;
