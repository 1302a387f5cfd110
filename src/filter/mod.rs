//! Filter state shared between input handling, URLs and pagination.
//!
//! - [`state`] -- [`FilterState`], the observable keyword/year holder.
//! - [`debounce`] -- [`KeywordDebouncer`], coalescing keystrokes into one update.
//! - [`codec`] -- [`UrlFilterCodec`], the shareable query-string representation.

pub mod codec;
pub mod debounce;
pub mod state;

pub use codec::{FilterCodec, FilterParams, UrlFilterCodec};
pub use debounce::KeywordDebouncer;
pub use state::{FilterState, Filters};
