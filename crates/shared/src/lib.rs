//! Shared utilities and common types for the FoodBooking backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing)
//! - Password hashing with Argon2id
//! - JWT token issuance and validation
//! - Common validation logic
//! - Cursor pagination for order history

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
