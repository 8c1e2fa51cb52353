//! Core of botargs: a quote-aware tokenizer and a parser for chat-bot style command lines.
#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod fmt;

pub mod lexer;
pub mod parser;
pub mod utils;

pub use lexer::{Locked, Pattern};
pub use parser::{
    DEFAULT_PREFIXES, Error, FixedFlags, Flag, FlagStore, Flags, ParseOptions, ParsedCommand,
    parse, parse_with_options, parse_with_prefixes,
};
pub use utils::to_bool;
