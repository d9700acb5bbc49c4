//! CLI command implementations.

mod ask;
mod index;
mod serve;
mod transcript;

pub use ask::run_ask;
pub use index::run_index;
pub use serve::run_serve;
pub use transcript::run_transcript;
