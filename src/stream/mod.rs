//! Streaming primitives: a size-bounded reader, the chunked transfer-coding
//! reader, and the header-block reader with continuation folding.

pub mod bounded;
pub mod chunked;
pub mod headers;

pub use bounded::BoundedReader;
pub use chunked::ChunkedReader;
pub use headers::HeaderStreamReader;
