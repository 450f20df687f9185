//! Input validation for ledger transactions.

use super::error::LedgerError;

/// Longest description a transaction may carry, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Trims a description and enforces the length limit.
///
/// Blank descriptions become `None`.
///
/// # Errors
///
/// Returns `LedgerError::InvalidDescription` if the trimmed text is longer
/// than [`MAX_DESCRIPTION_CHARS`] characters.
pub fn normalize_description(raw: Option<&str>) -> Result<Option<String>, LedgerError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let chars = text.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(LedgerError::InvalidDescription { length: chars });
    }

    Ok(Some(text.to_string()))
}
