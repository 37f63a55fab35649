//! Source schemas and normalization for the equilibrium monitor.
//!
//! Each configured [`SourceKind`] has exactly one wire schema. The
//! [`MessageParser`] decodes it into a tagged [`RawReading`], and the
//! [`Normalizer`] resolves that into one canonical `MarketReading`,
//! substituting a synthetic fallback when the source is unreachable or the
//! payload is unrecognized.

pub mod error;
pub mod normalizer;
pub mod parser;
pub mod raw;
pub mod source;
pub mod synthetic;

pub use error::{FeedError, FeedResult};
pub use normalizer::{Normalizer, NormalizerStats};
pub use parser::MessageParser;
pub use raw::{RawReading, SnapshotFields, TickerFields};
pub use source::SourceKind;
pub use synthetic::{SyntheticGenerator, REASON_DATA_SHAPE, REASON_UNREACHABLE};
