//! Cinescope-Common: Shared types and errors.
//!
//! This crate provides the domain vocabulary used across cinescope:
//!
//! - **Queries**: [`Query`] with keyword/year normalization and filter identity
//! - **Movies**: [`MovieSummary`] and the paged [`ResultPage`] shape
//! - **Core Types**: [`Genre`] labels and [`ImageSize`] tokens
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use cinescope_common::{Error, Query, Result};
//!
//! let query = Query::new(Some("batman".into()), Some(2022));
//! assert_eq!(query.keyword.as_deref(), Some("batman"));
//! assert_eq!(query.page, 1);
//! assert!(Query::new(Some("   ".into()), None).is_default());
//!
//! fn example() -> Result<()> {
//!     Err(Error::configuration("TMDB access token is not set"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod movie;
pub mod query;
pub mod types;

pub use error::{Error, Result};
pub use movie::{MovieSummary, ResultPage};
pub use query::{Query, START_PAGE};
pub use types::*;
