//! Hex encoding of exit event ids as they travel over JSON-RPC.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseExitIdError {
    #[error("Exit id is empty")]
    Empty,

    #[error("Invalid hex exit id '{0}'")]
    Invalid(String),
}

/// Parse a hex exit id, with or without a `0x` prefix.
pub fn parse_exit_id(input: &str) -> Result<u64, ParseExitIdError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.is_empty() {
        return Err(ParseExitIdError::Empty);
    }
    u64::from_str_radix(digits, 16).map_err(|_| ParseExitIdError::Invalid(input.to_string()))
}

/// Format an exit id the way [`parse_exit_id`] expects it.
pub fn format_exit_id(id: u64) -> String {
    format!("{id:#x}")
}
