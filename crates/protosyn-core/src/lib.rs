#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Lossless source store for protobuf IDL files.
//!
//! One [`FileInfo`] per file owns the raw bytes, the line table and the span
//! of every lexed item. Tokens and comments share a single ordered index space
//! ([`Item`]); a [`Token`] is an item known to be a grammatical terminal.
//!
//! The store is append-only while the lexer runs and immutable after
//! [`FileInfoBuilder::finish`], so it can be shared freely across threads.

mod file_info;
mod info;
mod invariants;
mod sequence;
mod token;

pub use file_info::{
    FileInfo, FileInfoBuilder, MAX_CONSECUTIVE_ZERO_LEN_TOKENS, ZERO_LEN_TOKEN_SLACK,
};
pub use info::{Comment, Comments, ItemInfo, ItemKind, NodeInfo, SourcePos};
pub use sequence::{Items, Sequence, SequenceIter, Tokens};
pub use token::{Item, ItemSpan, Token};

pub use rowan::{TextRange, TextSize};

#[cfg(test)]
mod file_info_tests;
#[cfg(test)]
mod sequence_tests;
