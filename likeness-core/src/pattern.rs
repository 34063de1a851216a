//! Compiled matching-pattern values.
//!
//! A pattern keeps its source text and flag bits alongside the result of
//! compiling it with `regex`. Equality only ever looks at the source and the
//! flags, so sources the regex crate rejects (backreferences, lookaround)
//! are still valid values; only matching against them fails.

use std::fmt;
use std::rc::Rc;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern flag `{0}`")]
    InvalidFlag(char),
    #[error("duplicate pattern flag `{0}`")]
    DuplicateFlag(char),
    #[error("invalid pattern: {0}")]
    Syntax(#[from] regex::Error),
}

/// Flag bits, written in the conventional `gimsuy` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PatternFlags(u8);

impl PatternFlags {
    pub const GLOBAL: PatternFlags = PatternFlags(1 << 0);
    pub const IGNORE_CASE: PatternFlags = PatternFlags(1 << 1);
    pub const MULTILINE: PatternFlags = PatternFlags(1 << 2);
    pub const DOT_ALL: PatternFlags = PatternFlags(1 << 3);
    pub const UNICODE: PatternFlags = PatternFlags(1 << 4);
    pub const STICKY: PatternFlags = PatternFlags(1 << 5);

    const LETTERS: [(char, PatternFlags); 6] = [
        ('g', PatternFlags::GLOBAL),
        ('i', PatternFlags::IGNORE_CASE),
        ('m', PatternFlags::MULTILINE),
        ('s', PatternFlags::DOT_ALL),
        ('u', PatternFlags::UNICODE),
        ('y', PatternFlags::STICKY),
    ];

    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let mut flags = PatternFlags::default();
        for ch in text.chars() {
            let flag = Self::LETTERS
                .iter()
                .find(|(letter, _)| *letter == ch)
                .map(|(_, flag)| *flag)
                .ok_or(PatternError::InvalidFlag(ch))?;
            if flags.contains(flag) {
                return Err(PatternError::DuplicateFlag(ch));
            }
            flags.0 |= flag.0;
        }
        Ok(flags)
    }

    pub fn contains(self, other: PatternFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PatternFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, flag) in Self::LETTERS {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Pattern {
    source: Rc<str>,
    flags: PatternFlags,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    /// Fails only on bad flags. A source that does not compile is kept and
    /// reported by `compile_error` and `is_match`.
    // `i`, `m` and `s` change how the source compiles; `g`, `u` and `y` are
    // carried for equality only.
    pub fn new(source: &str, flags: &str) -> Result<Self, PatternError> {
        let flags = PatternFlags::parse(flags)?;
        let compiled = RegexBuilder::new(source)
            .case_insensitive(flags.contains(PatternFlags::IGNORE_CASE))
            .multi_line(flags.contains(PatternFlags::MULTILINE))
            .dot_matches_new_line(flags.contains(PatternFlags::DOT_ALL))
            .build();
        Ok(Pattern {
            source: source.into(),
            flags,
            compiled,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    pub fn compile_error(&self) -> Option<&regex::Error> {
        self.compiled.as_ref().err()
    }

    pub fn is_match(&self, haystack: &str) -> Result<bool, PatternError> {
        match &self.compiled {
            Ok(regex) => Ok(regex.is_match(haystack)),
            Err(error) => Err(PatternError::Syntax(error.clone())),
        }
    }

    /// Same source text and exactly the same flag bits.
    pub fn same_pattern(&self, other: &Pattern) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let flags = PatternFlags::parse("gi").unwrap();
        assert!(flags.contains(PatternFlags::GLOBAL));
        assert!(flags.contains(PatternFlags::IGNORE_CASE));
        assert!(!flags.contains(PatternFlags::MULTILINE));
        assert_eq!(PatternFlags::parse("").unwrap(), PatternFlags::default());
    }

    #[test]
    fn test_flags_display_is_canonical() {
        assert_eq!(PatternFlags::parse("yig").unwrap().to_string(), "giy");
    }

    #[test]
    fn test_flag_errors() {
        assert!(matches!(PatternFlags::parse("q"), Err(PatternError::InvalidFlag('q'))));
        assert!(matches!(PatternFlags::parse("gg"), Err(PatternError::DuplicateFlag('g'))));
    }

    #[test]
    fn test_syntax_error_surfaces_on_match() {
        let pattern = Pattern::new("(unclosed", "").unwrap();
        assert!(pattern.compile_error().is_some());
        assert!(matches!(pattern.is_match("x"), Err(PatternError::Syntax(_))));
    }

    #[test]
    fn test_backreference_is_representable() {
        let a = Pattern::new(r"(a)\1", "g").unwrap();
        let b = Pattern::new(r"(a)\1", "g").unwrap();
        assert!(a.same_pattern(&b));
        assert!(!a.same_pattern(&Pattern::new(r"(a)\1", "").unwrap()));
        assert_eq!(a.to_string(), r"/(a)\1/g");
        assert!(a.is_match("aa").is_err());

        let lookahead = Pattern::new("a(?=b)", "").unwrap();
        assert!(lookahead.compile_error().is_some());
    }

    #[test]
    fn test_flags_affect_matching() {
        let sensitive = Pattern::new("abc", "").unwrap();
        let insensitive = Pattern::new("abc", "i").unwrap();
        assert!(sensitive.compile_error().is_none());
        assert!(!sensitive.is_match("ABC").unwrap());
        assert!(insensitive.is_match("ABC").unwrap());
    }

    #[test]
    fn test_same_pattern() {
        let a = Pattern::new("a+b", "g").unwrap();
        assert!(a.same_pattern(&Pattern::new("a+b", "g").unwrap()));
        assert!(!a.same_pattern(&Pattern::new("a+b", "gi").unwrap()));
        assert!(!a.same_pattern(&Pattern::new("a+", "g").unwrap()));
        assert_eq!(a.to_string(), "/a+b/g");
    }
}
