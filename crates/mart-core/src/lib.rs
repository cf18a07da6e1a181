//! # mart-core
//!
//! Core types, ID prefixes, and error types for Mart.
//!
//! This crate provides the foundational types shared across all Mart crates:
//! - Record structs for the four collections (users, projects, surveys, transactions)
//! - Input structs used to create those records
//! - Enums for project visibility and collection names
//! - ID prefix constants
//! - The `WriteStatus` envelope returned by every write
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod validation;
