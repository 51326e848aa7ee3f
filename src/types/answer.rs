use handle_errors::{Error, ErrorCode};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub answer_correct: bool,
}

/// Trims surrounding whitespace and lower-cases. A missing value normalizes to "".
///
/// Applied to both the submitted answer and the stored solution before comparing.
pub fn normalize(text: Option<&str>) -> String {
    match text {
        Some(text) => text.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Pulls the normalized `answer` query parameter, rejecting it when empty.
pub fn extract_answer(params: &HashMap<String, String>) -> Result<String, Error> {
    let answer = normalize(params.get("answer").map(String::as_str));
    if answer.is_empty() {
        return Err(Error::invalid_usage("answer not set", ErrorCode::AnswerNotSet));
    }

    Ok(answer)
}

pub fn check(answer: &str, solution: Option<&str>) -> AnswerCheck {
    AnswerCheck {
        answer_correct: answer == normalize(solution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize(Some("  PaRiS \n")), "paris");
        assert_eq!(normalize(Some("   ")), "");
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn empty_answer_is_rejected_before_comparison() {
        let mut params = HashMap::new();
        assert_eq!(
            extract_answer(&params).unwrap_err().code(),
            ErrorCode::AnswerNotSet
        );

        params.insert("answer".to_string(), " \t ".to_string());
        assert_eq!(
            extract_answer(&params).unwrap_err().code(),
            ErrorCode::AnswerNotSet
        );
    }

    #[test]
    fn comparison_is_symmetric_after_normalizing() {
        assert!(check(&normalize(Some("  PARIS ")), Some("Paris")).answer_correct);
        assert!(check(&normalize(Some("paris")), Some("  paris  ")).answer_correct);
        assert!(!check(&normalize(Some("Lyon")), Some("Paris")).answer_correct);
        assert!(!check("paris", None).answer_correct);
    }
}
