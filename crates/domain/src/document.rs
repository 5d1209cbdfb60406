//! Fiscal identifiers: CPF (individuals, 11 digits) and CNPJ (entities, 14 digits).
//!
//! All checks run over an explicit digit sequence and fail closed: any
//! structural mismatch yields `false`, never a panic. Beyond the checksum,
//! only sequences made of a single repeated digit are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const INDIVIDUAL_LEN: usize = 11;
const ENTITY_LEN: usize = 14;

/// Which kind of fiscal identifier a digit string is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// CPF, 11 digits.
    Individual,
    /// CNPJ, 14 digits.
    Entity,
}

/// Strip every character that is not an ASCII digit.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Classify `input` by its normalized length.
#[must_use]
pub fn classify(input: &str) -> Option<DocumentKind> {
    match normalize(input).len() {
        INDIVIDUAL_LEN => Some(DocumentKind::Individual),
        ENTITY_LEN => Some(DocumentKind::Entity),
        _ => None,
    }
}

/// Validate an already-normalized 11-digit CPF.
#[must_use]
pub fn is_valid_individual(digits: &str) -> bool {
    let Some(d) = to_digits::<INDIVIDUAL_LEN>(digits) else {
        return false;
    };
    if all_same(&d) {
        return false;
    }

    let first = individual_check_digit(&d[..9], 10);
    let second = individual_check_digit(&d[..10], 11);
    first == u32::from(d[9]) && second == u32::from(d[10])
}

/// Validate an already-normalized 14-digit CNPJ.
#[must_use]
pub fn is_valid_entity(digits: &str) -> bool {
    let Some(d) = to_digits::<ENTITY_LEN>(digits) else {
        return false;
    };
    if all_same(&d) {
        return false;
    }

    let first = entity_check_digit(&d[..12], 5);
    let second = entity_check_digit(&d[..13], 6);
    first == u32::from(d[12]) && second == u32::from(d[13])
}

/// Normalize `input` and validate it as a CPF or CNPJ depending on its length.
#[must_use]
pub fn is_valid_document(input: &str) -> bool {
    let digits = normalize(input);
    match digits.len() {
        INDIVIDUAL_LEN => is_valid_individual(&digits),
        ENTITY_LEN => is_valid_entity(&digits),
        _ => false,
    }
}

/// Render `input` with the conventional CPF / CNPJ separators.
///
/// Returns `input` unchanged when its normalized length is neither 11 nor 14.
#[must_use]
pub fn format(input: &str) -> String {
    let d = normalize(input);
    match d.len() {
        INDIVIDUAL_LEN => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
        ENTITY_LEN => format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        ),
        _ => input.to_string(),
    }
}

/// Normalize and validate `input`, returning the bare digit string.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedIdentifier`] when the normalized
/// input is not a valid CPF or CNPJ.
pub fn parse(input: &str) -> Result<String, ValidationError> {
    if is_valid_document(input) {
        Ok(normalize(input))
    } else {
        Err(ValidationError::MalformedIdentifier)
    }
}

fn to_digits<const N: usize>(digits: &str) -> Option<[u8; N]> {
    let bytes = digits.as_bytes();
    if bytes.len() != N || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut out = [0u8; N];
    for (slot, byte) in out.iter_mut().zip(bytes) {
        *slot = byte - b'0';
    }
    Some(out)
}

fn all_same(digits: &[u8]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Weights run from `start` down to 2.
fn individual_check_digit(digits: &[u8], start: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start).rev())
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    let remainder = 11 - sum % 11;
    if remainder >= 10 { 0 } else { remainder }
}

/// Weights start at `start`, decrement, and wrap from 2 back to 9.
fn entity_check_digit(digits: &[u8], start: u32) -> u32 {
    let weights = std::iter::successors(Some(start), |w| Some(if *w == 2 { 9 } else { w - 1 }));
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// A validated, normalized CPF or CNPJ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Document(String);

impl Document {
    /// Normalize and validate `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedIdentifier`] when `input` is not a
    /// valid CPF or CNPJ.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        parse(input).map(Self)
    }

    /// The bare digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        if self.0.len() == INDIVIDUAL_LEN {
            DocumentKind::Individual
        } else {
            DocumentKind::Entity
        }
    }

    /// The digit string with separators, e.g. `111.444.777-35`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format(&self.0)
    }
}

impl TryFrom<String> for Document {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Document> for String {
    fn from(value: Document) -> Self {
        value.0
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
