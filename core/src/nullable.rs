//! Field decoders for loosely-typed course tables.
//!
//! Empty cells and nulls become `None`. Numeric cells that do not parse also
//! become `None`; a missing value is never reported as zero.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Free text; whitespace-only cells count as absent. JSON readers turn
/// numeric and boolean text cells into strings before this runs.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Identifiers that may have been widened to floats ("1070968.0").
pub fn identifier<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let cell: Option<Cell> = Option::deserialize(d)?;
    Ok(match cell {
        Some(Cell::Number(n)) if n.is_finite() && n.fract() == 0.0 => Some(format!("{n:.0}")),
        Some(Cell::Number(n)) if n.is_finite() => Some(n.to_string()),
        Some(Cell::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("nan") { None } else { Some(s.to_string()) }
        }
        Some(Cell::Flag(b)) => Some(b.to_string()),
        _ => None,
    })
}

pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let cell: Option<Cell> = Option::deserialize(d)?;
    Ok(cell.and_then(cell_to_f64))
}

/// Non-negative counts; "2147.0" is accepted as 2147.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let cell: Option<Cell> = Option::deserialize(d)?;
    Ok(cell
        .and_then(cell_to_f64)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64))
}

pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let cell: Option<Cell> = Option::deserialize(d)?;
    Ok(match cell {
        Some(Cell::Flag(b)) => Some(b),
        Some(Cell::Number(n)) if n.is_finite() => Some(n != 0.0),
        Some(Cell::Text(s)) => parse_flag(&s),
        _ => None,
    })
}

pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn cell_to_f64(cell: Cell) -> Option<f64> {
    let n = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Flag(_) => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "identifier")]
        id: Option<String>,
        #[serde(deserialize_with = "float")]
        rating: Option<f64>,
        #[serde(deserialize_with = "count")]
        subscribers: Option<u64>,
        #[serde(deserialize_with = "flag")]
        is_paid: Option<bool>,
        #[serde(deserialize_with = "text")]
        title: Option<String>,
    }

    fn parse(csv_text: &str) -> Vec<Row> {
        let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());
        rdr.deserialize().collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn csv_cells_decode_with_nulls() {
        let rows = parse(
            "id,rating,subscribers,is_paid,title\n\
             1070968.0,4.7,2147.0,True,Ultimate Investment Banking\n\
             ,Not Calibrated,,,  \n",
        );
        assert_eq!(rows[0].id.as_deref(), Some("1070968"));
        assert_eq!(rows[0].rating, Some(4.7));
        assert_eq!(rows[0].subscribers, Some(2147));
        assert_eq!(rows[0].is_paid, Some(true));
        assert_eq!(rows[0].title.as_deref(), Some("Ultimate Investment Banking"));

        assert_eq!(rows[1].id, None);
        assert_eq!(rows[1].rating, None);
        assert_eq!(rows[1].subscribers, None);
        assert_eq!(rows[1].is_paid, None);
        assert_eq!(rows[1].title, None);
    }

    #[test]
    fn json_values_decode_with_nulls() {
        let row: Row = serde_json::from_str(
            r#"{"id": 42, "rating": null, "subscribers": 0, "is_paid": "no", "title": "Java"}"#,
        )
        .unwrap();
        assert_eq!(row.id.as_deref(), Some("42"));
        assert_eq!(row.rating, None);
        assert_eq!(row.subscribers, Some(0));
        assert_eq!(row.is_paid, Some(false));
    }
}
