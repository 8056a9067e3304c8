//! Cover image caching and resolution

mod cache;
mod resolver;

pub use cache::{local_cover_key, remote_cover_key, CoverCache, Partition};
pub use resolver::CoverResolver;
