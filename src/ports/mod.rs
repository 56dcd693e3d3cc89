//! Ports (trait boundaries) between the episode loop and its consumers.

pub mod observer;

pub use observer::Observer;
