use crate::normalizer::normalize;
use crate::nullable;
use serde::{Deserialize, Serialize};

/// One row of the unified course table, as supplied by the corpus source.
///
/// Column order matches the table written by the cleaning pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    #[serde(deserialize_with = "nullable::identifier")]
    pub course_id: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "nullable::flag")]
    pub is_paid: Option<bool>,
    #[serde(default, deserialize_with = "nullable::text")]
    pub price: Option<String>,
    #[serde(deserialize_with = "nullable::count")]
    pub subscribers: Option<u64>,
    #[serde(deserialize_with = "nullable::count")]
    pub reviews: Option<u64>,
    #[serde(deserialize_with = "nullable::count")]
    pub lectures: Option<u64>,
    #[serde(deserialize_with = "nullable::text")]
    pub level: Option<String>,
    #[serde(deserialize_with = "nullable::float")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "nullable::text")]
    pub published_timestamp: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    pub provider: Option<String>,
    #[serde(deserialize_with = "nullable::float")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "nullable::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::text")]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "nullable::text")]
    pub text_for_tfidf: Option<String>,
}

impl CourseRow {
    /// The text the index is built from: the precomputed combined field when
    /// present, else title, description and skills.
    pub fn index_text(&self) -> String {
        if let Some(combined) = &self.text_for_tfidf {
            return combined.clone();
        }
        [&self.title, &self.description, &self.skills]
            .iter()
            .map(|f| f.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An indexed course. Immutable once the index is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRecord {
    pub course_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub provider: Option<String>,
    pub level: Option<String>,
    pub duration: Option<f64>,
    pub rating: Option<f64>,
    pub is_paid: Option<bool>,
    pub subscribers: Option<u64>,
    pub reviews: Option<u64>,
    pub lectures: Option<u64>,
    pub subject: Option<String>,
    pub normalized_text: String,
}

impl From<CourseRow> for CourseRecord {
    fn from(row: CourseRow) -> Self {
        let normalized_text = normalize(&row.index_text());
        Self {
            course_id: row.course_id,
            title: row.title,
            url: row.url,
            provider: row.provider,
            level: row.level,
            duration: row.duration,
            rating: row.rating,
            is_paid: row.is_paid,
            subscribers: row.subscribers,
            reviews: row.reviews,
            lectures: row.lectures,
            subject: row.subject,
            normalized_text,
        }
    }
}
