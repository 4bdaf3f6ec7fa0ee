//! Study session composition engine.
//!
//! Every function here is synchronous and works on quizzes that were already
//! loaded from the store, so it can be driven from tests without MongoDB.

pub mod bookmarks;
pub mod compose;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod sampler;

pub use bookmarks::resolve_bookmarks;
pub use compose::{compose_session, SESSION_TITLE};
pub use error::StudyError;
pub use filter::{available_filters, filter};
pub use flatten::flatten;
pub use sampler::sample;

#[cfg(test)]
pub(crate) mod test_support;
