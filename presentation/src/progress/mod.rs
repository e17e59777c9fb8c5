//! Progress display for running discussions

pub mod reporter;
