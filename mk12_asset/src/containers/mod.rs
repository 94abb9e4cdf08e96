//! Containers used by decoded asset values

pub mod chain_map;
pub use chain_map::{ChainMap, Slot};
pub mod shared_resource;
pub use shared_resource::SharedResource;
