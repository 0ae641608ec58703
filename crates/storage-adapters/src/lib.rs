//! # storage-adapters
//!
//! In-process implementations of the persistence ports, plus the default id
//! generator.

pub mod ids;
pub mod memory;

pub use ids::UuidV7Ids;
pub use memory::{
    MemoryMessageRepo, MemoryResRepo, MemoryTokenRepo, MemoryTopicRepo, MemoryUserRepo,
};
