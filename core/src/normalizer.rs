use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    // Course-catalog noise. "server" stays out so that "sql server" survives as a unit.
    static ref DOMAIN_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "system", "course", "online", "learn",
            "developer", "development", "introduction",
            "intro", "basics", "fundamentals",
            "beginner", "advanced",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_domain_stopword(token: &str) -> bool { DOMAIN_STOPWORDS.contains(token) }

/// Lowercase, split on whitespace, drop domain stopwords and rejoin with single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered
        .split_whitespace()
        .filter(|w| !is_domain_stopword(w))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_domain_noise() {
        assert_eq!(normalize("Online Python Course for Beginner"), "python for");
        assert_eq!(normalize("Advanced   Java\tBasics"), "java");
    }

    #[test]
    fn keeps_sql_server_together() {
        assert_eq!(normalize("SQL Server fundamentals"), "sql server");
    }

    #[test]
    fn empty_or_noise_only_text_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("course online"), "");
    }
}
