//! Data shared between the logic and render threads.

pub mod snapshot;
