//! # EAV API Architecture
//!
//! eavapi exposes entities whose schema is defined at runtime (an
//! Entity-Attribute-Value model) to a generic API layer. Given a request
//! carrying arbitrary filter and order parameters, it resolves each parameter
//! to a typed attribute, possibly across relations (`brand.country`), and
//! compiles it into conditions on a backend-agnostic query builder.
//!
//! It is a **library**: no stdout, no process exit, every operation returns
//! `Result<T, EavError>`. HTTP dispatch, ORM execution and response
//! serialization belong to the caller.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                        │
//! │  - Builds named filters from configuration                  │
//! │  - Dispatches describe / apply / metadata per resource      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filters (filter/)                                          │
//! │  - Extract parameters, compile values, AND the conditions   │
//! │  - Boolean, numeric, search and order kinds                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Resolution (resolve/)                                      │
//! │  - Resource type → family                                   │
//! │  - Property name → attribute path (synonyms, dotted hops)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema Registry (schema/)                                  │
//! │  - Families and attributes, loaded once, read-only after    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filters hand their conditions to the [`query::QueryBuilder`] contract.
//! [`query::memory::MemoryQuery`] implements it over an in-memory
//! [`store::InMemoryStore`]; a database backend implements the same traits.
//!
//! ## Errors
//!
//! Resolution failures are never swallowed by `apply`: an unknown property in
//! a request is a client error, a bad schema or wiring is a server error
//! (see [`error::EavError::class`]). `describe` is the one place that
//! tolerates unknown properties, so documentation survives stale configuration.
//!
//! ## Logging
//!
//! Through the [`log`] facade. The library never installs a logger.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for API frameworks
//! - [`filter`]: Filter compiler and descriptors
//! - [`resolve`]: Family and attribute path resolution
//! - [`schema`]: Families, attributes, storage and semantic types, the registry
//! - [`query`]: Query builder contract and the in-memory builder
//! - [`store`]: Data records and the in-memory store
//! - [`request`]: Query-string parsing and the request context
//! - [`metadata`]: Property names and property metadata for documentation
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod query;
pub mod request;
pub mod resolve;
pub mod schema;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::EavApi;
pub use error::{EavError, ErrorClass, Result};
