//! Parsing for the values a transport layer hands over as text.
//!
//! Negative draw counts are rejected here and nowhere else: everything
//! past this point takes `usize`.

use crate::ValidationError;

/// Missing means `false`. Accepts `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
pub fn parse_shuffle(raw: Option<&str>) -> Result<bool, ValidationError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValidationError::InvalidShuffleFlag(raw.to_string())),
    }
}

/// Comma separated card codes, taken verbatim. A present but empty value
/// is one empty code, not an absent list, so it selects no cards. Unknown
/// or padded codes are kept and simply match nothing later.
pub fn parse_card_codes(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| raw.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn parse_count(raw: &str) -> Result<usize, ValidationError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidCount(raw.to_string()))?;
    if value < 0 {
        return Err(ValidationError::NegativeCount(value));
    }
    usize::try_from(value).map_err(|_| ValidationError::InvalidCount(raw.to_string()))
}
