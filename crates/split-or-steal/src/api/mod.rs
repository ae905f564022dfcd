//! The generation backend seam.
//!
//! - [`backend`] — the [`GenerationBackend`] trait every game call goes
//!   through, its request/reply types, and the OpenRouter implementation.

pub mod backend;

pub use self::backend::{
    BackendError, Generation, GenerationBackend, GenerationFuture, GenerationRequest,
};
