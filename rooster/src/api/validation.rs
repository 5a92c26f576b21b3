//! Field-level validation of client input. Every function returns the
//! message shown to the client on failure; handlers collect them so one
//! response reports every broken field at once.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_YEAR: i32 = 1995;
pub const MAX_PAGE: i64 = 100_000;
pub const MAX_COMMENT_LENGTH: usize = 255;

const SEVERITY_CODES: [&str; 4] = ["LOW", "MEDIUM", "HIGH", "CRITICAL"];
const LABEL_IDS: [i32; 4] = [1, 2, 3, 4];

lazy_static! {
    static ref KEYWORD: Regex = Regex::new(r"^[A-Za-z0-9]{1,32}$").unwrap();
    static ref CVE_ID: Regex = Regex::new(r"^CVE-[0-9]{4}-[0-9]{4,}$").unwrap();
    static ref MAIL_ADDRESS: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref SLACK_WEBHOOK_URL: Regex =
        Regex::new(r"^https://hooks\.slack\.com/services/.+$").unwrap();
}

pub fn severity(value: &str) -> Result<String, String> {
    if SEVERITY_CODES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err("severity must be one of LOW, MEDIUM, HIGH, CRITICAL".to_string())
    }
}

pub fn year(value: &str) -> Result<i32, String> {
    value
        .parse::<i32>()
        .map_err(|_| String::new())
        .and_then(year_value)
        .map_err(|_| {
            format!(
                "year must be an integer between {MIN_YEAR} and {}",
                current_year()
            )
        })
}

pub fn year_value(year: i32) -> Result<i32, String> {
    if (MIN_YEAR..=current_year()).contains(&year) {
        Ok(year)
    } else {
        Err(format!(
            "year must be an integer between {MIN_YEAR} and {}",
            current_year()
        ))
    }
}

pub fn page(value: &str) -> Result<i64, String> {
    match value.parse::<i64>() {
        Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(page),
        _ => Err(format!("page must be an integer between 1 and {MAX_PAGE}")),
    }
}

pub fn keyword(value: &str) -> Result<String, String> {
    if KEYWORD.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("keyword must be 1 to 32 alphanumeric characters".to_string())
    }
}

/// Comma-separated label ids, e.g. `label=1,3`.
pub fn labels(value: &str) -> Result<Vec<i32>, String> {
    value
        .split(',')
        .map(|part| match part.trim().parse::<i32>() {
            Ok(id) => label_id(id),
            Err(_) => Err("label must be a comma-separated list of label ids".to_string()),
        })
        .collect()
}

pub fn label_id(id: i32) -> Result<i32, String> {
    if LABEL_IDS.contains(&id) {
        Ok(id)
    } else {
        Err(format!("label id {id} is unknown"))
    }
}

pub fn boolean(field: &str, value: &str) -> Result<bool, String> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!("{field} must be one of true, false, 1, 0")),
    }
}

pub fn cve_id(value: &str) -> Result<String, String> {
    if CVE_ID.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("cve_id has an invalid format".to_string())
    }
}

pub fn comment(value: &str) -> Result<String, String> {
    if value.chars().count() <= MAX_COMMENT_LENGTH {
        Ok(value.to_string())
    } else {
        Err(format!(
            "comment must be {MAX_COMMENT_LENGTH} characters or fewer"
        ))
    }
}

pub fn mail_address(value: &str) -> Result<String, String> {
    if MAIL_ADDRESS.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("mail_address has an invalid format".to_string())
    }
}

pub fn slack_webhook_url(value: &str) -> Result<String, String> {
    if SLACK_WEBHOOK_URL.is_match(value) {
        Ok(value.to_string())
    } else {
        Err("slack_webhook_url must be a Slack incoming webhook URL".to_string())
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_accepts_the_known_codes_only() {
        for code in ["LOW", "MEDIUM", "HIGH", "CRITICAL"] {
            assert_eq!(severity(code).unwrap(), code);
        }
        for code in ["low", "NONE", "critical", ""] {
            assert!(severity(code).is_err(), "{code:?} should be rejected");
        }
    }

    #[test]
    fn year_bounds() {
        assert_eq!(year("1995").unwrap(), 1995);
        assert_eq!(year(&current_year().to_string()).unwrap(), current_year());
        assert!(year("1994").is_err());
        assert!(year(&(current_year() + 1).to_string()).is_err());
        assert!(year("twenty").is_err());
    }

    #[test]
    fn page_bounds() {
        assert_eq!(page("1").unwrap(), 1);
        assert_eq!(page("100000").unwrap(), 100_000);
        assert!(page("0").is_err());
        assert!(page("100001").is_err());
        assert!(page("first").is_err());
    }

    #[test]
    fn keyword_is_short_alphanumeric() {
        assert_eq!(keyword("openssl").unwrap(), "openssl");
        assert_eq!(keyword("A1").unwrap(), "A1");
        assert!(keyword("").is_err());
        assert!(keyword("with space").is_err());
        assert!(keyword("dash-ed").is_err());
        assert!(keyword(&"a".repeat(33)).is_err());
    }

    #[test]
    fn labels_are_comma_separated_known_ids() {
        assert_eq!(labels("1").unwrap(), vec![1]);
        assert_eq!(labels("1,3,4").unwrap(), vec![1, 3, 4]);
        assert_eq!(labels("2, 3").unwrap(), vec![2, 3]);
        assert!(labels("5").is_err());
        assert!(labels("one").is_err());
        assert!(labels("1,,2").is_err());
    }

    #[test]
    fn boolean_accepts_the_four_spellings() {
        assert!(boolean("f", "true").unwrap());
        assert!(boolean("f", "1").unwrap());
        assert!(!boolean("f", "false").unwrap());
        assert!(!boolean("f", "0").unwrap());
        assert!(boolean("f", "True").is_err());
        assert!(boolean("f", "yes").is_err());
    }

    #[test]
    fn cve_id_format() {
        assert!(cve_id("CVE-2024-0001").is_ok());
        assert!(cve_id("CVE-2024-123456").is_ok());
        assert!(cve_id("CVE-24-0001").is_err());
        assert!(cve_id("cve-2024-0001").is_err());
        assert!(cve_id("CVE-2024-001").is_err());
    }

    #[test]
    fn comment_length_counts_characters() {
        assert!(comment(&"a".repeat(255)).is_ok());
        assert!(comment(&"a".repeat(256)).is_err());
        // Multibyte text is measured in characters, not bytes.
        assert!(comment(&"あ".repeat(255)).is_ok());
    }

    #[test]
    fn notification_target_formats() {
        assert!(mail_address("user@example.com").is_ok());
        assert!(mail_address("user@example").is_err());
        assert!(mail_address("not a mail").is_err());
        assert!(slack_webhook_url("https://hooks.slack.com/services/T0/B0/x").is_ok());
        assert!(slack_webhook_url("https://example.com/webhook").is_err());
        assert!(slack_webhook_url("http://hooks.slack.com/services/T0").is_err());
    }
}
