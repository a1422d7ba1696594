pub mod candidate;
pub mod codec;
pub mod depgraph;
pub mod dict;
pub mod error;
pub mod feature;
pub mod learning;
pub mod matrix;
pub mod ordering;
pub mod resources;
pub mod segclass;
pub mod segmenter;
pub mod settings;
pub mod splitter;
#[cfg(test)]
pub(crate) mod testutil;
pub mod wtype;
pub mod xchar;

pub use error::EngineError;
pub use resources::Resources;
pub use segmenter::Segmenter;
