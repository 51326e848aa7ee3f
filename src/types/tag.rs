use handle_errors::{Error, ErrorCode};
use std::collections::HashMap;

/// Query parameters accepted by `/tag/<tag_name>`.
#[derive(Default, Debug, PartialEq)]
pub struct TagQuery {
    /// Upper bound on returned rows, applied by the database.
    pub limit: Option<u32>,
}

/// Extracts `limit` from the query string.
/// # Example query
/// `/tag/geo?limit=10`
pub fn extract_tag_query(params: &HashMap<String, String>) -> Result<TagQuery, Error> {
    let limit = match params.get("limit") {
        Some(limit) => Some(parse_limit(limit)?),
        None => None,
    };

    Ok(TagQuery { limit })
}

fn parse_limit(token: &str) -> Result<u32, Error> {
    let invalid = || Error::invalid_usage("limit must be an integer greater than 0", ErrorCode::Undefined);

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match token.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(invalid()),
    }
}
