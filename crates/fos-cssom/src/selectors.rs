//! CSS Selectors & Specificity
//!
//! Selectors keep their source text and a specificity computed once at
//! construction. Specificity filters compare that weight against a threshold
//! through a fixed operator table.

use std::fmt;
use std::str::FromStr;

use crate::CssomError;

/// Selector specificity (a, b, c) where:
/// a = ID selectors
/// b = class, attribute, pseudo-class
/// c = type, pseudo-element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    pub fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self(ids, classes, types)
    }

    /// Add another specificity to this one
    pub fn add(&mut self, other: Specificity) {
        self.0 = self.0.saturating_add(other.0);
        self.1 = self.1.saturating_add(other.1);
        self.2 = self.2.saturating_add(other.2);
    }

    /// Single comparable weight (ids x100, classes x10, types x1), saturating
    /// at `u32::MAX`
    pub fn value(&self) -> u32 {
        self.0
            .saturating_mul(100)
            .saturating_add(self.1.saturating_mul(10))
            .saturating_add(self.2)
    }

    /// Compute the specificity of a single complex selector
    pub fn of(selector: &str) -> Self {
        let mut specificity = Specificity::default();
        scan(selector.as_bytes(), &mut specificity);
        specificity
    }
}

/// Pseudo-elements that may be written with a single colon
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Pseudo-classes whose argument contributes instead of the pseudo-class
const TRANSPARENT_PSEUDO_CLASSES: &[&str] = &["not", "is", "has"];

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'\\' || b >= 0x80
}

fn take_ident(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Index just past the bracket matching the opener at `open`
fn skip_group(bytes: &[u8], open: usize, opener: u8, closer: u8) -> usize {
    let mut depth = 0;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == opener => depth += 1,
            None if b == closer => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            None => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Split a selector list on commas outside brackets and quotes
fn split_top_level(bytes: &[u8]) -> Vec<&[u8]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    parts.push(&bytes[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&bytes[start..]);
    parts
}

fn scan(bytes: &[u8], specificity: &mut Specificity) {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                specificity.0 += 1;
                i = take_ident(bytes, i + 1);
            }
            b'.' => {
                specificity.1 += 1;
                i = take_ident(bytes, i + 1);
            }
            b'[' => {
                specificity.1 += 1;
                i = skip_group(bytes, i, b'[', b']');
            }
            b':' => {
                let element = bytes.get(i + 1) == Some(&b':');
                let start = if element { i + 2 } else { i + 1 };
                let end = take_ident(bytes, start);
                let name = String::from_utf8_lossy(&bytes[start..end]).to_ascii_lowercase();
                let has_args = bytes.get(end) == Some(&b'(');

                if element || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                    specificity.2 += 1;
                } else if name == "where" {
                    // zero specificity
                } else if has_args && TRANSPARENT_PSEUDO_CLASSES.contains(&name.as_str()) {
                    let close = skip_group(bytes, end, b'(', b')');
                    let inner_end = close.saturating_sub(1).max(end + 1);
                    let mut inner = Specificity::default();
                    for part in split_top_level(&bytes[end + 1..inner_end]) {
                        let mut candidate = Specificity::default();
                        scan(part, &mut candidate);
                        inner = inner.max(candidate);
                    }
                    specificity.add(inner);
                    i = close;
                    continue;
                } else {
                    specificity.1 += 1;
                }

                i = if has_args { skip_group(bytes, end, b'(', b')') } else { end };
            }
            b if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => {
                specificity.2 += 1;
                i = take_ident(bytes, i);
            }
            // '*', combinators, whitespace, namespace bars
            _ => i += 1,
        }
    }
}

/// CSS selector with its precomputed specificity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    text: String,
    specificity: Specificity,
}

impl Selector {
    /// Create a selector, computing its specificity from the text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let specificity = Specificity::of(&text);
        Self { text, specificity }
    }

    /// Create a selector with a specificity already computed by a parser
    pub fn with_specificity(text: impl Into<String>, specificity: Specificity) -> Self {
        Self {
            text: text.into(),
            specificity,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Comparable specificity weight
    pub fn weight(&self) -> u32 {
        self.specificity.value()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Comparison operator of a specificity filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

/// Operator spellings, longest first so `>=` is tried before `>`
const OPERATORS: &[(&str, Comparison)] = &[
    ("==", Comparison::Equal),
    ("!=", Comparison::NotEqual),
    (">=", Comparison::GreaterOrEqual),
    ("<=", Comparison::LessOrEqual),
    (">", Comparison::Greater),
    ("<", Comparison::Less),
];

impl Comparison {
    pub fn apply(&self, lhs: u32, rhs: u32) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }
}

/// Filter on selector specificity, e.g. `>= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecificityFilter {
    pub comparison: Comparison,
    pub threshold: u32,
}

impl SpecificityFilter {
    pub fn new(comparison: Comparison, threshold: u32) -> Self {
        Self { comparison, threshold }
    }

    pub fn matches(&self, specificity: u32) -> bool {
        self.comparison.apply(specificity, self.threshold)
    }

    pub fn accepts(&self, selector: &Selector) -> bool {
        self.matches(selector.weight())
    }
}

impl From<u32> for SpecificityFilter {
    fn from(threshold: u32) -> Self {
        Self::new(Comparison::Equal, threshold)
    }
}

impl FromStr for SpecificityFilter {
    type Err = CssomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            tracing::debug!("Invalid specificity filter {:?}", s);
            CssomError::InvalidFilter(s.to_string())
        };

        let (comparison, rest) = OPERATORS
            .iter()
            .find_map(|(op, comparison)| trimmed.strip_prefix(op).map(|rest| (*comparison, rest)))
            .unwrap_or((Comparison::Equal, trimmed));

        let rest = rest.trim_start();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let threshold = rest.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self::new(comparison, threshold))
    }
}

impl fmt::Display for SpecificityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparison.as_str(), self.threshold)
    }
}
