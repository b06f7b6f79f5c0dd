//! # cadence-core
//!
//! Core types, the day clock, and the unlock rules for Cadence.
//!
//! This crate provides the foundational types shared across all Cadence crates:
//! - Entity structs for enrollments, task templates, submissions, and unlock records
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - The journey-day clock (civil-date arithmetic in an IANA timezone)
//! - The unlock rule evaluator consulted by every read and write path
//! - CLI/API response types
//!
//! Nothing in here performs I/O.

pub mod clock;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod rules;
