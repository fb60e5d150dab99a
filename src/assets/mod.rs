//! Static asset serving with path containment and per-class cache policy.

pub mod policy;
pub mod resolver;
pub mod server;

pub use policy::{AssetClass, CachePolicy};
pub use resolver::{PathResolver, resolve};
pub use server::AssetServer;
