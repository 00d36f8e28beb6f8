//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `product` - catalog query parameters
//! - `cart` - cart request/response DTOs
//! - `error` - common error response DTO
//! - `health` - liveness response

mod cart;
mod error;
mod health;
mod product;

pub use cart::{AddToCartRequest, CartItemResponse, CartResponse};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use product::{ProductListParams, SearchParams};
