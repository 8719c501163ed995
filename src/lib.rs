//! relcheck - upstream release monitor library
//!
//! This library provides the core functionality for tracking upstream
//! releases of third-party dependencies:
//! - GitHub releases
//! - cfitsio tarball (MD5, header markers, changelog excerpt)
//!
//! New releases are announced as GitHub issues or issue comments, and the
//! last seen version of each dependency is kept in a reference file.

pub mod checker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod notify;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod reference;
