//! Contracts between the CSS engine and its embedders: the document and
//! element interrogation surface consumed by the selector matcher and the
//! cascade, the cascade origin ordering, the media query vocabulary, and the
//! resource fetching seam used by `@import` and `@font-face`.

pub mod css;
pub mod document;
pub mod fetcher;
pub mod media;
