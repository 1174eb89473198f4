//! Binary primitives shared by the function and section record codecs.

mod codec;

pub use codec::{ByteReader, ByteWriter};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("truncated data")]
    TruncatedData,
    #[error("invalid record magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: String, found: String },
    #[error("unknown subfunction degree {0}")]
    UnknownDegree(i32),
    #[error("invalid element count {0}")]
    InvalidCount(i32),
    #[error("subfunction {0} does not continue the function domain")]
    InvalidDomain(usize),
    #[error("more than one subfunction is locked")]
    MultipleLocked,
    #[error("section name is not valid UTF-8")]
    InvalidName,
}
