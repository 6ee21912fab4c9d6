//! Async client for Akeneo-style PIM REST APIs.
//!
//! The centrepiece is the search criteria compiler in [`search`]: typed
//! filter declarations are validated at construction, merged by target key,
//! and serialized either as a flat query-parameter mapping (GET) or as the
//! raw nested criteria (POST body). Around it, [`client`] handles OAuth and
//! transport, [`resources`] exposes thin per-entity wrappers, [`throttle`]
//! keeps the connection inside its call quota, and [`pagination`] wraps the
//! HAL-style page envelope.
//!
//! ```no_run
//! use akeneo_client::{AkeneoClient, Credentials, SearchBuilder};
//!
//! # async fn run() -> akeneo_client::Result<()> {
//! let client = AkeneoClient::new(
//!     "https://pim.example.com",
//!     Credentials::new("client_id", "secret", "user", "pass"),
//! )?;
//!
//! let mut search = SearchBuilder::new();
//! search
//!     .filters(|f| {
//!         f.enabled(true)?.completeness(80, "ecommerce", "<")?;
//!         Ok(())
//!     })?
//!     .limit(100);
//!
//! let page = client.products().list(&search).await?;
//! for product in &page {
//!     println!("{:?}", product.identifier);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod errors;
pub mod models;
pub mod pagination;
pub mod resources;
pub mod search;
pub mod throttle;

pub use client::{AkeneoClient, Credentials};
pub use errors::{Error, FilterError, Result};
pub use models::{Category, Product, ProductModel};
pub use pagination::PaginatedResponse;
pub use search::{
    Condition, Filter, FilterBuilder, SearchBuilder, SearchCriteria, SearchParams,
};
pub use throttle::LeakyBucket;
