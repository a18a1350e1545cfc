use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid {expected} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits `KEY=VALUE` at the first `=`. The key is trimmed and must not be empty.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

pub fn parse_scalar<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Parses a comma-separated list. An empty or blank string is the empty list.
pub fn parse_list<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<Vec<T>, ParseError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|item| parse_scalar(key, item, expected))
        .collect()
}

/// Parses semicolon-separated comma lists, e.g. `2,3;2,3,5`.
pub fn parse_nested_list<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<Vec<Vec<T>>, ParseError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(';')
        .map(|group| parse_list(key, group, expected))
        .collect()
}
