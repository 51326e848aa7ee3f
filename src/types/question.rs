use handle_errors::{Error, ErrorCode};
use serde::Serialize;

use crate::types::segment::decode_segment;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// What `/question/<id>` hands out. Carries no solution.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl From<Question> for QuestionView {
    fn from(question: Question) -> Self {
        QuestionView {
            title: question.title,
            content: question.content,
            tags: question.tags,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct QuestionId(pub i64);

impl QuestionId {
    /// Validates a raw path token: after percent-decoding, decimal digits only,
    /// strictly positive and within `i64`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let wrong_id = || Error::invalid_usage("id must be an integer greater than 0", ErrorCode::WrongId);

        let token = decode_segment(raw).ok_or_else(wrong_id)?;
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(wrong_id());
        }
        match token.parse::<i64>() {
            Ok(id) if id > 0 => Ok(QuestionId(id)),
            _ => Err(wrong_id()),
        }
    }
}

/// Splits the comma-joined `tags` column. Empty pieces are dropped.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(QuestionId::parse("1").unwrap(), QuestionId(1));
        assert_eq!(QuestionId::parse("0042").unwrap(), QuestionId(42));
        assert_eq!(QuestionId::parse("%31").unwrap(), QuestionId(1));
    }

    #[test]
    fn rejects_everything_else_with_wrong_id() {
        for token in ["", "0", "000", "-1", "+1", "1.5", "abc", " 1", "1a", "%2D1", "%FF", "99999999999999999999"] {
            let error = QuestionId::parse(token).unwrap_err();
            assert_eq!(error.code(), ErrorCode::WrongId, "token {:?}", token);
            assert_eq!(error.status().as_u16(), 400);
        }
    }

    #[test]
    fn tags_are_split_on_commas() {
        assert_eq!(split_tags(Some("geo,capitals")), vec!["geo", "capitals"]);
        assert_eq!(split_tags(Some("rust, web ,,")), vec!["rust", "web"]);
        assert!(split_tags(Some("")).is_empty());
        assert!(split_tags(None).is_empty());
    }
}
