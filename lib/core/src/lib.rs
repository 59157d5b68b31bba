//! Core domain types for the vestibule authentication library.
//!
//! This crate provides the foundational types shared by the vestibule
//! session, identity, and login crates.

pub mod account;

pub use account::AccountNo;
