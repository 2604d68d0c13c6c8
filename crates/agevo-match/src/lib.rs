//! Company-to-grant ("bando") matching for the AGEVO MATCH lead intake site.
//!
//! The [`matching`] module holds the scoring engine together with the thin collaborator
//! layer around it: profile intake, grant catalog import, repositories, service and router.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
