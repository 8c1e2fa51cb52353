//! botargs, a `no_std` parser for chat-bot style command lines.
//!
//! ```
//! let cmd = botargs::parse("!ban --user=alice --silent").unwrap();
//!
//! assert_eq!(cmd.command(), "ban");
//! assert_eq!(cmd.get_str(&["user", "u"]), Some("alice"));
//! assert_eq!(cmd.get_bool(&["silent"]), Some(true));
//! ```
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub use botargs_parser as parser;

pub use parser::{
    DEFAULT_PREFIXES, FixedFlags, Flag, Flags, ParseOptions, ParsedCommand, to_bool,
};

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// An error comes from the parsing of a command line.
    #[error(transparent)]
    Parser(#[from] parser::Error),
}

/// Parse a command line with the default prefixes.
pub fn parse(text: &str) -> Result<ParsedCommand<'_>, Error> {
    Ok(parser::parse(text)?)
}

/// Parse a command line accepting the given prefixes.
pub fn parse_with_prefixes<'a>(
    text: &'a str,
    prefixes: &'a [char],
) -> Result<ParsedCommand<'a>, Error> {
    Ok(parser::parse_with_prefixes(text, prefixes)?)
}

/// Parse a command line with the given options.
pub fn parse_with_options<'a>(
    text: &'a str,
    options: &ParseOptions<'a>,
) -> Result<ParsedCommand<'a>, Error> {
    Ok(parser::parse_with_options(text, options)?)
}
