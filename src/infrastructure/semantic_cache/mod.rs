//! Vector index implementations backing the semantic cache

mod in_memory;

pub use in_memory::InMemoryVectorIndex;
