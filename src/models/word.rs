use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// カテゴリに属する 1 単語を表すドメインモデル。
/// `category_id` は `categories.id` への外部キーに対応する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub word: String,
    pub category_id: Uuid,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response projection of a word row for the public listing.
/// Renames `category_id` to `categoryId` and drops the approval and
/// timestamp columns from the wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordView {
    pub id: Uuid,
    pub word: String,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
}

/// Body of a successful `GET /api/words` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResponse {
    pub words: Vec<WordView>,
}

impl From<Word> for WordView {
    fn from(word: Word) -> Self {
        WordView {
            id: word.id,
            word: word.word,
            category_id: word.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_word() -> Word {
        Word {
            id: Uuid::parse_str("3b5a8c1d-6e2f-4a9b-b7c3-0d4e8f1a2b6c").unwrap(),
            word: "apple".to_string(),
            category_id: Uuid::parse_str("7f1c6a2e-9d3b-4c5f-8a1d-2e6b9c0f4a71").unwrap(),
            approved: true,
            created_at: DateTime::parse_from_rfc3339("2022-01-01T00:00:00Z").unwrap().with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2022-01-01T00:00:00Z").unwrap().with_timezone(&Utc),
        }
    }

    #[test]
    fn test_word_view_projection() {
        let word = sample_word();
        let view = WordView::from(word.clone());

        assert_eq!(view.id, word.id);
        assert_eq!(view.word, "apple");
        assert_eq!(view.category_id, word.category_id);
    }

    #[test]
    fn test_word_view_serialization_renames_category_id() {
        let view = WordView::from(sample_word());

        let json = serde_json::to_string(&view).expect("Failed to serialize word view");
        let expected = r#"{"id":"3b5a8c1d-6e2f-4a9b-b7c3-0d4e8f1a2b6c","word":"apple","categoryId":"7f1c6a2e-9d3b-4c5f-8a1d-2e6b9c0f4a71"}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_word_list_response_serialization() {
        let response = WordListResponse {
            words: vec![WordView::from(sample_word())],
        };

        let json = serde_json::to_string(&response).expect("Failed to serialize word list response");
        let expected = r#"{"words":[{"id":"3b5a8c1d-6e2f-4a9b-b7c3-0d4e8f1a2b6c","word":"apple","categoryId":"7f1c6a2e-9d3b-4c5f-8a1d-2e6b9c0f4a71"}]}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_word_list_response_serialization() {
        let response = WordListResponse { words: vec![] };

        let json = serde_json::to_string(&response).expect("Failed to serialize word list response");
        assert_eq!(json, r#"{"words":[]}"#);
    }

    #[test]
    fn test_word_deserialization() {
        let json = r#"{"id":"3b5a8c1d-6e2f-4a9b-b7c3-0d4e8f1a2b6c","word":"apple","category_id":"7f1c6a2e-9d3b-4c5f-8a1d-2e6b9c0f4a71","approved":true,"created_at":"2022-01-01T00:00:00Z","updated_at":"2022-01-01T00:00:00Z"}"#;

        let word: Word = serde_json::from_str(json).expect("Failed to deserialize word");

        assert_eq!(word.word, "apple");
        assert!(word.approved);
        assert_eq!(word.category_id, Uuid::parse_str("7f1c6a2e-9d3b-4c5f-8a1d-2e6b9c0f4a71").unwrap());
    }
}
