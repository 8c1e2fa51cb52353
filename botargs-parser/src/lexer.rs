//! A quote-aware lexer for splitting a command line without breaking quoted values apart.
//!
//! Splitting goes through a [`Locked`] view of the text. While locked, a delimiter that occurs
//! inside a double-quoted span is not a split point, so `--note="a -- b"` stays in one piece.
//! Locking never rewrites the text: every piece is a sub-slice of the input and unlocking it
//! gives back the original characters.

/// Opens and closes a protected span.
pub const QUOTE: char = '"';

/// The character following an escape is never taken as a quote.
pub const ESCAPE: char = '\\';

/// Defines what a delimiter looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern<'p> {
    /// A literal string (e.g. `--`).
    Str(&'p str),

    /// Any single character of the set.
    AnyOf(&'p [char]),

    /// Any single whitespace character.
    Whitespace,
}

impl Pattern<'_> {
    /// Length in bytes of the match at the very start of the input, if any.
    fn match_len(&self, input: &str) -> Option<usize> {
        match *self {
            Pattern::Str(s) if !s.is_empty() && input.starts_with(s) => Some(s.len()),
            Pattern::Str(_) => None,
            Pattern::AnyOf(set) => input
                .chars()
                .next()
                .filter(|c| set.contains(c))
                .map(char::len_utf8),
            Pattern::Whitespace => input
                .chars()
                .next()
                .filter(|c| c.is_whitespace())
                .map(char::len_utf8),
        }
    }
}

/// A text slice with its quoted spans protected from splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Locked<'a> {
    text: &'a str,
}

impl<'a> Locked<'a> {
    /// Lock the special characters of the given text.
    #[inline(always)]
    pub fn new(text: &'a str) -> Self {
        Locked { text }
    }

    /// Give the text back, quoted spans included.
    #[inline(always)]
    pub fn unlock(self) -> &'a str {
        self.text
    }

    /// Evaluate if the text is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Remove leading and trailing whitespace.
    #[inline(always)]
    pub fn trim(self) -> Self {
        Locked::new(self.text.trim())
    }

    /// Find the first match of the pattern that is not inside a quoted span. Returns the byte
    /// range of the match.
    ///
    /// An unterminated quote protects everything up to the end of the text.
    pub fn find(&self, pattern: Pattern<'_>) -> Option<(usize, usize)> {
        let mut quoted = false;
        let mut escaped = false;

        for (i, c) in self.text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }

            match c {
                ESCAPE => escaped = true,
                QUOTE => quoted = !quoted,
                _ if !quoted => {
                    if let Some(len) = pattern.match_len(&self.text[i..]) {
                        return Some((i, i + len));
                    }
                }
                _ => {}
            }
        }

        None
    }

    /// Evaluate if the pattern occurs outside of any quoted span.
    #[inline(always)]
    pub fn contains(&self, pattern: Pattern<'_>) -> bool {
        self.find(pattern).is_some()
    }

    /// Split on every unlocked occurrence of the pattern.
    #[inline(always)]
    pub fn split<'p>(self, pattern: Pattern<'p>) -> Split<'a, 'p> {
        Split::new(self.text, pattern, usize::MAX)
    }

    /// Split on the unlocked occurrences of the pattern, producing at most `count` pieces. The
    /// last piece holds the rest of the text.
    #[inline(always)]
    pub fn split_n<'p>(self, count: usize, pattern: Pattern<'p>) -> Split<'a, 'p> {
        Split::new(self.text, pattern, count)
    }

    /// Split once, at the first unlocked match of the first pattern that occurs at all.
    ///
    /// Patterns are tried in order: a later pattern is only looked for when none of the
    /// previous ones occur, whatever their positions in the text.
    pub fn split_first(self, patterns: &[Pattern<'_>]) -> (Locked<'a>, Option<Locked<'a>>) {
        match patterns.iter().find_map(|p| self.find(*p)) {
            Some((start, end)) => (
                Locked::new(&self.text[..start]),
                Some(Locked::new(&self.text[end..])),
            ),
            None => (self, None),
        }
    }
}

/// An iterator over the pieces of a [`Locked`] text.
#[derive(Clone, Debug)]
pub struct Split<'a, 'p> {
    rest: Option<&'a str>,
    pattern: Pattern<'p>,
    remaining: usize,
}

impl<'a, 'p> Split<'a, 'p> {
    fn new(text: &'a str, pattern: Pattern<'p>, count: usize) -> Self {
        Split {
            rest: Some(text),
            pattern,
            remaining: count,
        }
    }
}

impl<'a> Iterator for Split<'a, '_> {
    type Item = Locked<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let rest = self.rest?;

        if self.remaining == 1 {
            self.rest = None;
            return Some(Locked::new(rest));
        }

        match Locked::new(rest).find(self.pattern) {
            Some((start, end)) => {
                self.rest = Some(&rest[end..]);
                self.remaining -= 1;
                Some(Locked::new(&rest[..start]))
            }
            None => {
                self.rest = None;
                Some(Locked::new(rest))
            }
        }
    }
}

/// Evaluate if the text starts with any of the characters.
#[inline(always)]
pub fn has_prefix_in(text: &str, chars: &[char]) -> bool {
    text.starts_with(chars)
}

/// Evaluate if the text ends with any of the characters.
#[inline(always)]
pub fn has_suffix_in(text: &str, chars: &[char]) -> bool {
    text.ends_with(chars)
}

/// Remove all leading occurrences of any of the characters.
#[inline(always)]
pub fn trim_start_in<'a>(text: &'a str, chars: &[char]) -> &'a str {
    text.trim_start_matches(chars)
}

/// Remove all trailing occurrences of any of the characters.
#[inline(always)]
pub fn trim_end_in<'a>(text: &'a str, chars: &[char]) -> &'a str {
    text.trim_end_matches(chars)
}

/// Remove the quotes surrounding the text.
#[inline(always)]
pub fn trim_quotes(text: &str) -> &str {
    text.trim_matches(QUOTE)
}
