//! # Blog Shared
//!
//! Request and response types exchanged with the frontend.

pub mod dto;
pub mod response;

pub use response::{CategoryUpdatedResponse, DataResponse, ErrorResponse, MessageResponse};
