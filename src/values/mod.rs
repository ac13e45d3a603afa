//! Standardized header value types: invertible text representations for
//! media types, codings, ranges, entity tags, cache directives, auth
//! challenges/credentials, and the rest of the header-value language.

pub mod auth;
pub mod byterange;
pub mod cache;
pub mod charset;
pub mod coding;
pub mod disposition;
pub mod etag;
pub mod keepalive;
pub mod language;
pub mod link;
pub mod media;
pub mod preference;
pub mod product;
pub mod protocol;
pub mod via;
pub mod warning;

/// Quality value, `q ∈ [0.0, 1.0]`, defaulting to `1.0`.
pub const DEFAULT_WEIGHT: f32 = 1.0;
