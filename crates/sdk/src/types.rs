//! SDK Request/Response Types
//!
//! Re-exports the wire types from the api-rpc crate so SDK users need a
//! single dependency.

pub use cattery_api_rpc::types::{ListCatsRequest, ListCatsResponse};
pub use cattery_core::domain::{Cat, CatId};
