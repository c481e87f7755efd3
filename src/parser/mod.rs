//! Scanner pipeline: comments, tags and code patterns merged per file.

pub mod aggregate;
pub mod builder;
pub mod code;
pub mod comments;
pub mod tags;
