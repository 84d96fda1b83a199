//! # Blog Core
//!
//! The domain layer of the blog backend: entities, content derivation
//! and the ports infrastructure has to implement.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, FieldErrors, RepoError};
