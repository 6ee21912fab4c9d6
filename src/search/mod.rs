//! Search criteria compiler.
//!
//! Turns fluent, typed filter declarations into the nested criteria
//! structure the search endpoint expects, merging filters that target the
//! same property and keeping pagination/locale/scope concerns separate from
//! the filter payload.
//!
//! ```
//! use akeneo_client::search::SearchBuilder;
//!
//! let mut search = SearchBuilder::new();
//! search
//!     .filters(|f| {
//!         f.enabled(true)?
//!             .family(&["clothing"], "IN")?
//!             .completeness(80, "ecommerce", ">")?;
//!         Ok(())
//!     })
//!     .unwrap()
//!     .search_locale("en_AU")
//!     .page(1)
//!     .limit(50);
//!
//! let params = search.build_search_params(); // GET query shape
//! let criteria = search.build_search_criteria(); // POST body shape
//! # assert!(params.search.is_some());
//! # assert_eq!(criteria.len(), 3);
//! ```

pub mod builder;
pub mod filter;
pub mod operators;

pub use builder::{FilterBuilder, SearchBuilder, SearchCriteria, SearchParams};
pub use filter::{Condition, Filter};
pub use operators::{
    BooleanOperator, CategoryOperator, ComparisonOperator, CompletenessOperator, DateOperator,
    ListOperator, ParentOperator, QualityScoreOperator, TextOperator,
};
