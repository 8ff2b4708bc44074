//! Core traits: release hooks and the resolver seam.

mod dispose;
mod resolver;

pub use dispose::Dispose;
pub use resolver::{AnyArc, Resolver, ResolverCore};
