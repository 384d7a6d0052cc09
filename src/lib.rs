//! Study Match - characteristic profiles and study group matching
//!
//! Users answer a short onboarding quiz that yields a seven-role
//! characteristic profile. Groups carry a reliability-weighted average of
//! their members' profiles, kept fresh by an event-driven recompute
//! dispatcher. Recommendations rank groups by how much a candidate would
//! even out the group's role coverage.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
