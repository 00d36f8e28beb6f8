//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod cart;
pub mod favorites;
pub mod health;
pub mod products;
