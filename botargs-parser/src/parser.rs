//! A parser for splitting a command line into a command, its flags and the text around them.
//!
//! The expected syntax is:
//!
//! ```text
//! <prefix><command>[ <first value>][ --<flag>[<sep><value>] ...]
//! ```
//!
//! where `<sep>` is `=`, `:` or whitespace, looked for in that order.

use crate::lexer::{self, Locked, Pattern};
use crate::utils;

/// Prefixes used when none are given.
pub const DEFAULT_PREFIXES: &[char] = &['/', '!'];

/// Marks the start of a flag.
pub const FLAG_MARKER: &str = "--";

/// Separators between a flag name and its value, by priority.
pub const VALUE_SEPARATORS: &[Pattern<'static>] =
    &[Pattern::Str("="), Pattern::Str(":"), Pattern::Whitespace];

/// Maximum number of flags of the default storage when the `alloc` feature is disabled.
pub const FLAG_COUNT_MAX: usize = 8;

/// Flag storage of fixed capacity `N`, which never allocates.
pub type FixedFlags<'a, const N: usize> = heapless::Vec<Flag<'a>, N>;

/// Default flag storage, without any limit on the number of flags.
#[cfg(feature = "alloc")]
pub type Flags<'a> = alloc::vec::Vec<Flag<'a>>;

/// Default flag storage, limited to [`FLAG_COUNT_MAX`] flags.
#[cfg(not(feature = "alloc"))]
pub type Flags<'a> = FixedFlags<'a, FLAG_COUNT_MAX>;

/// Defines the possible errors that may occur during parsing of a command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The input text is empty.
    #[error("empty input")]
    EmptyInput,

    /// The input text does not start with one of the prefixes.
    #[error("not a command")]
    NotACommand,

    /// The command token cannot be extracted.
    #[error("missing command")]
    MissingCommand,

    /// The command token is empty.
    #[error("empty command")]
    EmptyCommand,

    /// The command token is only made of prefixes and whitespace.
    #[error("command is only whitespace")]
    WhitespaceOnlyCommand,

    /// Insufficient space for storing the flags. Only a fixed capacity storage (see
    /// [`FixedFlags`]) runs out of space.
    #[error("out of parser memory space")]
    OutOfMemory,
}

/// Defines the options of a parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseOptions<'a> {
    prefixes: &'a [char],
}

impl<'a> ParseOptions<'a> {
    /// Create options from a set of prefixes. An empty set falls back to [`DEFAULT_PREFIXES`].
    pub const fn new(prefixes: &'a [char]) -> Self {
        let prefixes = if prefixes.is_empty() {
            DEFAULT_PREFIXES
        } else {
            prefixes
        };

        ParseOptions { prefixes }
    }

    /// Get the characters accepted in front of a command. Never empty.
    #[inline(always)]
    pub fn prefixes(&self) -> &'a [char] {
        self.prefixes
    }
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES)
    }
}

/// A flag found after the command (e.g. `--user=alice` or `--silent`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flag<'a> {
    name: &'a str,
    index: usize,
    value: Option<&'a str>,
}

impl<'a> Flag<'a> {
    /// Build a flag from the text between two markers. Returns `None` when there is no name.
    fn from_segment(segment: Locked<'a>, index: usize) -> Option<Self> {
        let segment = segment.trim();
        if segment.is_empty() {
            return None;
        }

        let (name, value) = segment.split_first(VALUE_SEPARATORS);

        let name = name.unlock().trim();
        if name.is_empty() {
            return None;
        }

        Some(Flag {
            name,
            index,
            value: value.map(|x| utils::clean_value(x.unlock())),
        })
    }

    /// Get the name, without the marker.
    #[inline(always)]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Get the position among the flags of the command, starting at zero.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the value, trimmed and unquoted. `None` if the flag is name only.
    #[inline(always)]
    pub fn value(&self) -> Option<&'a str> {
        self.value
    }

    /// Get the value text, or an empty string for a name only flag.
    #[inline(always)]
    pub fn raw_value_text(&self) -> &'a str {
        self.value.unwrap_or_default()
    }

    /// Check if the flag carries a value, even an empty one.
    #[inline(always)]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check if the flag is only a name (e.g. `--verbose`).
    #[inline(always)]
    pub fn is_name_only(&self) -> bool {
        self.value.is_none()
    }

    /// Read the flag as a boolean. A name only flag is `true`, otherwise the value must be
    /// recognized by [`utils::to_bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            None => Some(true),
            Some(value) => utils::to_bool(value),
        }
    }
}

/// Defines a storage for the flags of a [`ParsedCommand`].
pub trait FlagStore<'a>: Default {
    /// Append a flag.
    fn push_flag(&mut self, flag: Flag<'a>) -> Result<(), Error>;

    /// Get the stored flags, in order of insertion.
    fn as_flags(&self) -> &[Flag<'a>];
}

impl<'a, const N: usize> FlagStore<'a> for FixedFlags<'a, N> {
    #[inline(always)]
    fn push_flag(&mut self, flag: Flag<'a>) -> Result<(), Error> {
        self.push(flag).map_err(|_| Error::OutOfMemory)
    }

    #[inline(always)]
    fn as_flags(&self) -> &[Flag<'a>] {
        self.as_slice()
    }
}

#[cfg(feature = "alloc")]
impl<'a> FlagStore<'a> for alloc::vec::Vec<Flag<'a>> {
    #[inline(always)]
    fn push_flag(&mut self, flag: Flag<'a>) -> Result<(), Error> {
        self.push(flag);
        Ok(())
    }

    #[inline(always)]
    fn as_flags(&self) -> &[Flag<'a>] {
        self.as_slice()
    }
}

/// Defines the result of parsing a command line. Every string borrows from the input text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedCommand<'a, F = Flags<'a>> {
    options: ParseOptions<'a>,
    command: &'a str,
    flags: F,
    raw_data: &'a str,
    first_value: &'a str,
}

impl<'a, F: FlagStore<'a>> ParsedCommand<'a, F> {
    /// Try to parse the command line with the given options.
    pub fn try_parse(text: &'a str, options: &ParseOptions<'a>) -> Result<Self, Error> {
        if text.is_empty() {
            trace!("rejected empty input");
            return Err(Error::EmptyInput);
        }

        let prefixes = options.prefixes();

        if !lexer::has_prefix_in(text, prefixes) {
            trace!("rejected input without prefix");
            return Err(Error::NotACommand);
        }

        let token = text
            .split(char::is_whitespace)
            .next()
            .ok_or(Error::MissingCommand)?;

        if token.is_empty() {
            trace!("rejected empty command token");
            return Err(Error::EmptyCommand);
        }

        let command = token
            .trim_start_matches(|c: char| prefixes.contains(&c) || c.is_whitespace())
            .trim_end();

        if command.is_empty() {
            trace!("rejected command made of prefixes only");
            return Err(Error::WhitespaceOnlyCommand);
        }

        let mut out = ParsedCommand {
            options: *options,
            command,
            flags: F::default(),
            raw_data: "",
            first_value: "",
        };

        let locked = Locked::new(text);

        // No marker outside of quotes, the whole tail is raw data. The original text is used so
        // that quoted spans are kept verbatim.
        if !locked.contains(Pattern::Str(FLAG_MARKER)) {
            out.raw_data = utils::text_after(text, command);
            debug!("command `{}` with raw data", command);
            return Ok(out);
        }

        let mut segments = locked.split(Pattern::Str(FLAG_MARKER));

        if let Some(head) = segments.next() {
            let head = lexer::trim_start_in(head.unlock(), prefixes);
            out.first_value = head.strip_prefix(command).unwrap_or(head).trim();
        }

        for segment in segments {
            let Some(flag) = Flag::from_segment(segment, out.flag_count()) else {
                continue;
            };

            trace!("flag `{}` at {}", flag.name(), flag.index());
            out.flags.push_flag(flag)?;
        }

        // Only dangling markers were found.
        if !out.has_flags() {
            out.raw_data = utils::text_after(text, command);
        }

        debug!("command `{}` with {} flag(s)", command, out.flag_count());

        Ok(out)
    }

    /// Get the options used for parsing.
    #[inline(always)]
    pub fn options(&self) -> &ParseOptions<'a> {
        &self.options
    }

    /// Get the command name, without prefix.
    #[inline(always)]
    pub fn command(&self) -> &'a str {
        self.command
    }

    /// Check if the command has the given name, ignoring ASCII case.
    #[inline(always)]
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }

    /// Get the flags, in order of appearance.
    #[inline(always)]
    pub fn flags(&self) -> &[Flag<'a>] {
        self.flags.as_flags()
    }

    /// Check if there are any flags.
    #[inline(always)]
    pub fn has_flags(&self) -> bool {
        !self.flags().is_empty()
    }

    /// Get the number of flags.
    #[inline(always)]
    pub fn flag_count(&self) -> usize {
        self.flags().len()
    }

    /// Get the text following the command. Only set when there are no flags.
    #[inline(always)]
    pub fn raw_data(&self) -> &'a str {
        self.raw_data
    }

    /// Check if there is some raw data.
    #[inline(always)]
    pub fn has_raw_data(&self) -> bool {
        !self.raw_data.is_empty()
    }

    /// Get the text between the command and the first flag.
    #[inline(always)]
    pub fn first_value(&self) -> &'a str {
        self.first_value
    }

    /// Get the first flag with the given name.
    pub fn flag(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags().iter().find(|x| x.name == name)
    }

    /// Get the first flag whose name is one of the given aliases.
    pub fn flag_any(&self, names: &[&str]) -> Option<&Flag<'a>> {
        self.flags().iter().find(|x| names.iter().any(|n| *n == x.name))
    }

    /// Check if there exists a flag with one of the given names.
    #[inline(always)]
    pub fn has_flag(&self, names: &[&str]) -> bool {
        self.flag_any(names).is_some()
    }

    /// Get the value of the first flag named by one of the aliases.
    ///
    /// The result is `None` if no such flag exists or if that flag is name only.
    pub fn get_str(&self, names: &[&str]) -> Option<&'a str> {
        self.flag_any(names).and_then(Flag::value)
    }

    /// Read the first flag named by one of the aliases as a boolean.
    ///
    /// The result is `None` if no such flag exists or if its value is not a boolean word.
    pub fn get_bool(&self, names: &[&str]) -> Option<bool> {
        self.flag_any(names).and_then(Flag::as_bool)
    }

    /// Get the first non-empty text among the value of the flag named by one of the aliases,
    /// the raw data and the first value.
    pub fn str_or_raw(&self, names: &[&str]) -> &'a str {
        match self.get_str(names) {
            Some(value) if !value.is_empty() => value,
            _ if !self.raw_data.is_empty() => self.raw_data,
            _ => self.first_value,
        }
    }
}

/// Parse a command line with the default options.
pub fn parse(text: &str) -> Result<ParsedCommand<'_>, Error> {
    ParsedCommand::try_parse(text, &ParseOptions::default())
}

/// Parse a command line accepting the given prefixes. An empty set selects the default ones.
pub fn parse_with_prefixes<'a>(
    text: &'a str,
    prefixes: &'a [char],
) -> Result<ParsedCommand<'a>, Error> {
    ParsedCommand::try_parse(text, &ParseOptions::new(prefixes))
}

/// Parse a command line with the given options.
pub fn parse_with_options<'a>(
    text: &'a str,
    options: &ParseOptions<'a>,
) -> Result<ParsedCommand<'a>, Error> {
    ParsedCommand::try_parse(text, options)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn it_should_parse_bare_command() {
        let cmd = parse("/help").unwrap();

        assert_that!(cmd.command(), eq("help"));
        assert_that!(cmd.has_flags(), eq(false));
        assert_that!(cmd.raw_data(), eq(""));
        assert_that!(cmd.first_value(), eq(""));
    }

    #[test]
    fn it_should_reject_invalid_input() {
        assert_that!(parse("").err(), eq(Some(Error::EmptyInput)));
        assert_that!(parse("hello").err(), eq(Some(Error::NotACommand)));
        assert_that!(parse(" /help").err(), eq(Some(Error::NotACommand)));
        assert_that!(parse("/").err(), eq(Some(Error::WhitespaceOnlyCommand)));
        assert_that!(parse("!/! help").err(), eq(Some(Error::WhitespaceOnlyCommand)));
    }

    #[test]
    fn it_should_reject_empty_command_token() {
        let options = ParseOptions::new(&[' ']);
        let res = ParsedCommand::<'_, FixedFlags<'_, 1>>::try_parse(" help", &options);
        assert_that!(res.err(), eq(Some(Error::EmptyCommand)));
    }

    #[test]
    fn it_should_parse_flags_with_and_without_value() {
        let cmd = parse("!ban --user=alice --silent").unwrap();

        assert_that!(cmd.command(), eq("ban"));
        assert_that!(cmd.flag_count(), eq(2));

        let user = cmd.flags()[0];
        assert_that!(user.name(), eq("user"));
        assert_that!(user.index(), eq(0));
        assert_that!(user.value(), eq(Some("alice")));

        let silent = cmd.flags()[1];
        assert_that!(silent.name(), eq("silent"));
        assert_that!(silent.index(), eq(1));
        assert_that!(silent.value(), eq(None));
        assert_that!(silent.is_name_only(), eq(true));

        assert_that!(cmd.raw_data(), eq(""));
    }

    #[test]
    fn it_should_parse_raw_data_without_flags() {
        let cmd = parse("/echo hello world").unwrap();
        assert_that!(cmd.command(), eq("echo"));
        assert_that!(cmd.raw_data(), eq("hello world"));

        let cmd = parse("/set key: value with spaces").unwrap();
        assert_that!(cmd.command(), eq("set"));
        assert_that!(cmd.has_flags(), eq(false));
        assert_that!(cmd.raw_data(), eq("key: value with spaces"));
    }

    #[test]
    fn it_should_keep_quoted_markers_in_raw_data() {
        let cmd = parse(r#"/say "a --b c" d"#).unwrap();

        assert_that!(cmd.has_flags(), eq(false));
        assert_that!(cmd.raw_data(), eq(r#""a --b c" d"#));
    }

    #[test]
    fn it_should_parse_first_value() {
        let cmd = parse("/warn bob please stop --reason=spam").unwrap();

        assert_that!(cmd.first_value(), eq("bob please stop"));
        assert_that!(cmd.raw_data(), eq(""));
        assert_that!(cmd.get_str(&["reason"]), eq(Some("spam")));
    }

    #[test]
    fn it_should_prefer_separators_by_priority() {
        let cmd = parse("/x --a:b=c --d e:f --g h i").unwrap();

        assert_that!(cmd.flags()[0].name(), eq("a:b"));
        assert_that!(cmd.flags()[0].value(), eq(Some("c")));
        assert_that!(cmd.flags()[1].name(), eq("d e"));
        assert_that!(cmd.flags()[1].value(), eq(Some("f")));
        assert_that!(cmd.flags()[2].name(), eq("g"));
        assert_that!(cmd.flags()[2].value(), eq(Some("h i")));
    }

    #[test]
    fn it_should_keep_quoted_delimiters_in_values() {
        let cmd = parse(r#"/note --text:"a=b" --msg="x -- y: z""#).unwrap();

        assert_that!(cmd.flag_count(), eq(2));
        assert_that!(cmd.get_str(&["text"]), eq(Some("a=b")));
        assert_that!(cmd.get_str(&["msg"]), eq(Some("x -- y: z")));
    }

    #[test]
    fn it_should_strip_extra_equal_sign() {
        let cmd = parse("/x --a= =b --c=").unwrap();

        assert_that!(cmd.get_str(&["a"]), eq(Some("b")));
        assert_that!(cmd.flags()[1].has_value(), eq(true));
        assert_that!(cmd.flags()[1].raw_value_text(), eq(""));
    }

    #[test]
    fn it_should_keep_duplicate_flags_in_order() {
        let cmd = parse("/x --tag=a --tag=b").unwrap();

        assert_that!(cmd.flag_count(), eq(2));
        assert_that!(cmd.flags()[1].value(), eq(Some("b")));
        assert_that!(cmd.get_str(&["tag"]), eq(Some("a")));
    }

    #[test]
    fn it_should_skip_nameless_segments() {
        let cmd = parse("/x ---- --=v --a --").unwrap();

        assert_that!(cmd.flag_count(), eq(1));
        assert_that!(cmd.flags()[0].name(), eq("a"));
        assert_that!(cmd.flags()[0].index(), eq(0));
    }

    #[test]
    fn it_should_fall_back_to_raw_data_on_dangling_marker() {
        let cmd = parse("/x text --").unwrap();

        assert_that!(cmd.has_flags(), eq(false));
        assert_that!(cmd.first_value(), eq("text"));
        assert_that!(cmd.raw_data(), eq("text --"));
    }

    #[test]
    fn it_should_fail_when_fixed_storage_is_full() {
        type Fixed<'a> = ParsedCommand<'a, FixedFlags<'a, 2>>;

        let options = ParseOptions::default();

        let res = Fixed::try_parse("/x --a --b --c", &options);
        assert_that!(res.err(), eq(Some(Error::OutOfMemory)));

        let res = Fixed::try_parse("/x --a --b", &options);
        assert_that!(res.is_ok(), eq(true));
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn it_should_parse_more_flags_than_fixed_capacity() {
        let cmd = parse("/x --a --b --c --d --e --f --g --h --i=9 --j").unwrap();

        assert_that!(cmd.flag_count(), eq(10));
        assert_that!(cmd.flags()[8].name(), eq("i"));
        assert_that!(cmd.flags()[8].index(), eq(8));
        assert_that!(cmd.flags()[8].value(), eq(Some("9")));
        assert_that!(cmd.flags()[9].index(), eq(9));
    }

    #[test]
    fn it_should_use_custom_prefixes() {
        let cmd = parse_with_prefixes(".ping", &['.']).unwrap();
        assert_that!(cmd.command(), eq("ping"));
        assert_that!(cmd.options().prefixes(), eq(&['.'][..]));

        assert_that!(
            parse_with_prefixes("/ping", &['.']).err(),
            eq(Some(Error::NotACommand))
        );

        let cmd = parse_with_prefixes("!ping", &[]).unwrap();
        assert_that!(cmd.options().prefixes(), eq(DEFAULT_PREFIXES));
    }

    #[test]
    fn it_should_look_up_flags_by_alias() {
        let cmd = parse("/ban --u=alice --force=off --quiet --why").unwrap();

        assert_that!(cmd.has_flag(&["user", "u"]), eq(true));
        assert_that!(cmd.has_flag(&["reason"]), eq(false));
        assert_that!(cmd.get_str(&["user", "u"]), eq(Some("alice")));
        assert_that!(cmd.get_bool(&["force", "f"]), eq(Some(false)));
        assert_that!(cmd.get_bool(&["quiet"]), eq(Some(true)));
        assert_that!(cmd.get_bool(&["u"]), eq(None));
        assert_that!(cmd.get_str(&["why"]), eq(None));
        assert_that!(cmd.flag("why").map(Flag::index), eq(Some(3)));
        assert_that!(cmd.is_command("BAN"), eq(true));
    }

    #[test]
    fn it_should_fall_back_from_flag_to_raw_data() {
        let cmd = parse("/say --text=hi").unwrap();
        assert_that!(cmd.str_or_raw(&["text"]), eq("hi"));

        let cmd = parse("/say hello there").unwrap();
        assert_that!(cmd.str_or_raw(&["text"]), eq("hello there"));

        let cmd = parse("/say hey --loud").unwrap();
        assert_that!(cmd.str_or_raw(&["text"]), eq("hey"));
    }
}
