pub mod error;
pub mod fetch;
pub mod filter;
pub mod merge;
pub mod model;
pub mod pagination;
pub mod post_view;
pub mod schedule;
pub mod screen;
pub mod sensor;
pub mod source;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::*;
pub use model::{Comment, Post, PostId, Profile};
pub use store::{Action, Store};
