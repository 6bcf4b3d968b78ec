use serde::{Deserialize, Serialize};

/// One reported-crimes observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub state: String,
    pub crime_category: String,
    pub crime_type: String,
    pub year: u16,
    pub reported_crimes: u64,
}

/// Parse the `Incident Date` column into a year.
///
/// Accepted spellings: a bare integer year (`2020`) or an ISO-like date
/// whose leading component is a 4-digit year (`2020-05-17`). Anything else
/// is rejected rather than coerced.
pub fn parse_year(raw: &str) -> Result<u16, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty incident date".to_string());
    }

    let lead = trimmed.split('-').next().unwrap_or(trimmed);
    if lead.len() == 4 && lead.bytes().all(|b| b.is_ascii_digit()) {
        return lead
            .parse::<u16>()
            .map_err(|e| format!("year out of range: {e}"));
    }

    Err(format!("unparseable incident date: {trimmed:?}"))
}

/// Parse the `Reported Crimes` column.
///
/// The upstream export writes whole counts as floats (`12.0`), so a zero
/// fraction is accepted; any other fractional value is an error.
pub fn parse_count(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty reported crimes".to_string());
    }

    let whole = match trimmed.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() || frac.bytes().any(|b| b != b'0') {
                return Err(format!("fractional reported crimes: {trimmed:?}"));
            }
            whole
        }
        None => trimmed,
    };

    whole
        .parse::<u64>()
        .map_err(|_| format!("unparseable reported crimes: {trimmed:?}"))
}
