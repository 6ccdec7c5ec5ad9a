// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text case conversion.

use std::fmt;
use std::str::FromStr;

use quickconv_core::error::{QuickconvError, Result};

/// The conversions offered by the case converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Upper,
    Lower,
    Sentence,
    Title,
    Toggle,
}

impl CaseMode {
    pub const ALL: [CaseMode; 5] = [
        Self::Upper,
        Self::Lower,
        Self::Sentence,
        Self::Title,
        Self::Toggle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Sentence => "sentence",
            Self::Title => "title",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMode {
    type Err = QuickconvError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_suffix("case").unwrap_or(&lower).trim_end_matches(['-', '_', ' ']);
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| QuickconvError::UnsupportedFormat(format!("unknown case mode '{s}'")))
    }
}

/// Apply `mode` to `text`.
pub fn convert(text: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => upper(text),
        CaseMode::Lower => lower(text),
        CaseMode::Sentence => sentence_case(text),
        CaseMode::Title => title_case(text),
        CaseMode::Toggle => toggle_case(text),
    }
}

pub fn upper(text: &str) -> String {
    text.to_uppercase()
}

pub fn lower(text: &str) -> String {
    text.to_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase everything, then capitalise the first word character of the
/// text and the first word character after `.`, `!` or `?` (skipping
/// whitespace in between).
pub fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    for c in text.to_lowercase().chars() {
        if matches!(c, '.' | '!' | '?') {
            capitalize_next = true;
            out.push(c);
        } else if c.is_whitespace() {
            out.push(c);
        } else if is_word_char(c) && capitalize_next {
            out.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            capitalize_next = false;
            out.push(c);
        }
    }
    out
}

/// Lowercase everything, then capitalise the first character of every
/// space-separated token.
pub fn title_case(text: &str) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Swap the case of every character.
pub fn toggle_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalises_each_word() {
        assert_eq!(title_case("hello world"), "Hello World");
        assert_eq!(title_case("hELLO  wORLD"), "Hello  World");
    }

    #[test]
    fn sentence_case_after_terminators() {
        assert_eq!(sentence_case("hello. world"), "Hello. World");
        assert_eq!(sentence_case("WHAT? yes! ok"), "What? Yes! Ok");
        assert_eq!(sentence_case("  leading space"), "  Leading space");
    }

    #[test]
    fn sentence_case_skips_leading_punctuation() {
        assert_eq!(sentence_case("\"quoted\" text"), "\"quoted\" text");
    }

    #[test]
    fn toggle_case_flips_letters() {
        assert_eq!(toggle_case("AbC"), "aBc");
        assert_eq!(toggle_case("1-2 x"), "1-2 X");
    }

    #[test]
    fn empty_input_stays_empty() {
        for mode in CaseMode::ALL {
            assert_eq!(convert("", mode), "");
        }
    }

    #[test]
    fn upper_and_lower() {
        assert_eq!(convert("MiXed", CaseMode::Upper), "MIXED");
        assert_eq!(convert("MiXed", CaseMode::Lower), "mixed");
    }

    #[test]
    fn parses_modes() {
        assert_eq!("Title".parse::<CaseMode>().unwrap(), CaseMode::Title);
        assert_eq!("sentence-case".parse::<CaseMode>().unwrap(), CaseMode::Sentence);
        assert_eq!("togglecase".parse::<CaseMode>().unwrap(), CaseMode::Toggle);
        assert!("camel".parse::<CaseMode>().is_err());
    }
}
