//! Streaming body pipeline: `decoder` composes the transfer/content-coding
//! stack described for a message's raw entity, `parsers` materializes an
//! already-decoded stream into bytes, text, a query string, a plain reader,
//! or a file.

pub mod decoder;
pub mod parsers;

pub use decoder::BodyDecoder;
pub use parsers::BodyParsers;
