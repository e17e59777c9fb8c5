//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] — the user's query that opens a discussion
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — display helpers

pub mod error;
pub mod question;
pub mod string;
