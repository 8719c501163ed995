//! Core domain models for relcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Checker variant tags selectable from the config file
//! - Tracked dependency definitions
//! - Version snapshots compared between runs
//! - Per-dependency outcomes and the run report

mod checker_kind;
mod dependency;
mod outcome;
mod snapshot;

pub use checker_kind::CheckerKind;
pub use dependency::{Dependency, DependencyOptions};
pub use outcome::{DependencyOutcome, DependencyReport, RunReport};
pub use snapshot::{VersionSnapshot, VERSION_FIELD};
