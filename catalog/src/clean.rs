//! Provider-specific cleaning into the unified course table.

use anyhow::{bail, Result};
use course_core::nullable;
use course_core::CourseRow;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct UdemyRaw {
    #[serde(deserialize_with = "nullable::identifier")]
    course_id: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    course_title: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    url: Option<String>,
    #[serde(deserialize_with = "nullable::flag")]
    is_paid: Option<bool>,
    #[serde(deserialize_with = "nullable::text")]
    price: Option<String>,
    #[serde(deserialize_with = "nullable::count")]
    num_subscribers: Option<u64>,
    #[serde(deserialize_with = "nullable::count")]
    num_reviews: Option<u64>,
    #[serde(deserialize_with = "nullable::count")]
    num_lectures: Option<u64>,
    #[serde(deserialize_with = "nullable::text")]
    level: Option<String>,
    #[serde(deserialize_with = "nullable::float")]
    content_duration: Option<f64>,
    #[serde(deserialize_with = "nullable::text")]
    published_timestamp: Option<String>,
    #[serde(deserialize_with = "nullable::text")]
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CourseraRaw {
    #[serde(rename = "Course Name", deserialize_with = "nullable::text")]
    name: Option<String>,
    #[serde(rename = "University", deserialize_with = "nullable::text")]
    university: Option<String>,
    #[serde(rename = "Difficulty Level", deserialize_with = "nullable::text")]
    difficulty: Option<String>,
    #[serde(rename = "Course Rating", deserialize_with = "nullable::float")]
    rating: Option<f64>,
    #[serde(rename = "Course URL", deserialize_with = "nullable::text")]
    url: Option<String>,
    #[serde(rename = "Course Description", deserialize_with = "nullable::text")]
    description: Option<String>,
    #[serde(rename = "Skills", deserialize_with = "nullable::text")]
    skills: Option<String>,
}

fn combined_text(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .map(|p| p.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl From<UdemyRaw> for CourseRow {
    fn from(raw: UdemyRaw) -> Self {
        let text = combined_text(&[&raw.course_title, &raw.subject]);
        CourseRow {
            course_id: raw.course_id,
            title: raw.course_title,
            url: raw.url,
            is_paid: raw.is_paid,
            price: raw.price,
            subscribers: raw.num_subscribers,
            reviews: raw.num_reviews,
            lectures: raw.num_lectures,
            level: raw.level,
            duration: raw.content_duration,
            published_timestamp: raw.published_timestamp,
            skills: raw.subject.clone(),
            subject: raw.subject,
            provider: Some("Udemy".to_string()),
            rating: None,
            description: None,
            text_for_tfidf: Some(text),
        }
    }
}

impl From<CourseraRaw> for CourseRow {
    fn from(raw: CourseraRaw) -> Self {
        let subject = raw
            .skills
            .as_deref()
            .and_then(|s| s.split(',').next())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        let text = combined_text(&[&raw.name, &raw.description, &raw.skills, &subject]);
        CourseRow {
            title: raw.name,
            provider: raw.university,
            level: raw.difficulty,
            rating: raw.rating,
            url: raw.url,
            description: raw.description,
            skills: raw.skills,
            subject,
            text_for_tfidf: Some(text),
            ..Default::default()
        }
    }
}

pub fn clean_udemy<R: Read>(reader: R) -> Result<Vec<CourseRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr
        .deserialize::<UdemyRaw>()
        .map(|r| r.map(CourseRow::from))
        .collect::<Result<Vec<_>, _>>()?;
    finish("Udemy", rows)
}

pub fn clean_coursera<R: Read>(reader: R) -> Result<Vec<CourseRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr
        .deserialize::<CourseraRaw>()
        .map(|r| r.map(CourseRow::from))
        .collect::<Result<Vec<_>, _>>()?;
    finish("Coursera", rows)
}

fn finish(provider: &str, rows: Vec<CourseRow>) -> Result<Vec<CourseRow>> {
    let before = rows.len();
    let rows = dedup(rows)?;
    validate(provider, &rows)?;
    tracing::info!(provider, rows = rows.len(), dropped = before - rows.len(), "cleaned dataset");
    Ok(rows)
}

/// Reject rows that can never be indexed or displayed.
pub fn validate(provider: &str, rows: &[CourseRow]) -> Result<()> {
    if let Some(i) = rows.iter().position(|r| r.title.is_none()) {
        bail!("{provider}: missing value in 'title' at row {}", i + 1);
    }
    if let Some(i) = rows.iter().position(|r| r.text_for_tfidf.is_none()) {
        bail!("{provider}: missing value in 'text_for_tfidf' at row {}", i + 1);
    }
    Ok(())
}

/// Drop exact duplicate rows, keeping the first occurrence.
pub fn dedup(rows: Vec<CourseRow>) -> Result<Vec<CourseRow>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(serde_json::to_string(&row)?) {
            out.push(row);
        }
    }
    Ok(out)
}

pub fn count_duplicates(rows: &[CourseRow]) -> Result<usize> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut dups = 0;
    for row in rows {
        if !seen.insert(serde_json::to_string(row)?) { dups += 1; }
    }
    Ok(dups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udemy_rows_map_to_unified_columns() {
        let data = "course_id,course_title,url,is_paid,price,num_subscribers,num_reviews,num_lectures,level,content_duration,published_timestamp,subject\n\
                    1070968,Ultimate Investment Banking Course,https://u/1,True,200,2147,23,51,All Levels,1.5,2017-01-18T20:58:58Z,Business Finance\n\
                    1070968,Ultimate Investment Banking Course,https://u/1,True,200,2147,23,51,All Levels,1.5,2017-01-18T20:58:58Z,Business Finance\n";
        let rows = clean_udemy(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.provider.as_deref(), Some("Udemy"));
        assert_eq!(r.rating, None);
        assert_eq!(r.skills.as_deref(), Some("Business Finance"));
        assert_eq!(r.subscribers, Some(2147));
        assert_eq!(r.text_for_tfidf.as_deref(), Some("ultimate investment banking course business finance"));
    }

    #[test]
    fn coursera_subject_is_first_skill() {
        let data = "Course Name,University,Difficulty Level,Course Rating,Course URL,Course Description,Skills\n\
                    Write A Feature Length Screenplay,Michigan State University,Beginner,4.8,https://c/1,Write a screenplay,\"Drama,  Comedy\"\n\
                    Business Strategy,University of Virginia,Advanced,Not Calibrated,https://c/2,Strategy,\n";
        let rows = clean_coursera(data.as_bytes()).unwrap();
        assert_eq!(rows[0].subject.as_deref(), Some("Drama"));
        assert_eq!(
            rows[0].text_for_tfidf.as_deref(),
            Some("write a feature length screenplay write a screenplay drama,  comedy drama")
        );
        assert_eq!(rows[1].rating, None);
        assert_eq!(rows[1].subject, None);
        assert_eq!(rows[1].subscribers, None);
    }

    #[test]
    fn missing_title_is_rejected() {
        let data = "Course Name,University,Difficulty Level,Course Rating,Course URL,Course Description,Skills\n\
                    ,MIT,Beginner,4.1,https://c/1,desc,skill\n";
        assert!(clean_coursera(data.as_bytes()).is_err());
    }

    #[test]
    fn duplicates_are_counted_and_dropped() {
        let a = CourseRow { title: Some("Rust".into()), provider: Some("Udemy".into()), ..Default::default() };
        let b = CourseRow { title: Some("Rust".into()), provider: Some("Coursera".into()), ..Default::default() };
        let rows = vec![a.clone(), b.clone(), a.clone(), a.clone()];
        assert_eq!(count_duplicates(&rows).unwrap(), 2);
        assert_eq!(dedup(rows).unwrap(), vec![a, b]);
    }
}
