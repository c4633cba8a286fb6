//! Data structures for DEG/function similarity analysis

mod category;
mod embedding;
mod reference;
mod similarity;
mod universe;

pub use category::{Category, PathwaySource};
pub use embedding::EmbeddingTable;
pub use reference::{InMemoryReference, ReferenceData};
pub use similarity::{column_prefix, SimilarityMatrix};
pub use universe::GeneUniverse;
