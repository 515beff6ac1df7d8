//! Fitness ranking
//!
//! Fitness evaluation itself is supplied by the embedding engine; this module
//! only defines how evaluated individuals are ordered.

pub mod ranker;

pub mod prelude {
    pub use super::ranker::*;
}
