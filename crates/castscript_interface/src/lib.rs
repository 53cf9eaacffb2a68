//! Trait definitions for castscript.
//!
//! The pipeline only needs one capability from a model backend: turn a
//! prompt into text. [`TextGenerator`] captures that contract so the Gemini
//! client, the HTTP gateway client and test doubles are interchangeable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::TextGenerator;
