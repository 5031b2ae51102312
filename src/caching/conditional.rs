//! Conditional retrieval (`If-None-Match` / `If-Modified-Since`).
//!
//! # Decision
//! ```text
//! If-None-Match present:
//!     cleaned tag is a prefix of our ETag  → Not Modified
//!     otherwise                            → full body
//! else If-Modified-Since present:
//!     unparseable date                     → full body
//!     last_modified > date                 → full body
//!     otherwise                            → Not Modified
//! else                                     → full body
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Validators accompanying a response, whether full or not modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Unquoted entity tag.
    pub etag: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Validators {
    /// `ETag` header value (quoted).
    pub fn etag_header(&self) -> String {
        format!("\"{}\"", self.etag)
    }

    /// `Last-Modified` header value, if any.
    pub fn last_modified_header(&self) -> Option<String> {
        self.last_modified.map(format_http_date)
    }
}

/// Conditional request headers as sent by the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preconditions<'a> {
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Send the full body.
    Modified,
    /// Send 304 with validators only.
    NotModified,
}

impl Preconditions<'_> {
    pub fn evaluate(&self, validators: &Validators) -> Freshness {
        if let Some(if_none_match) = self.if_none_match {
            let cleaned = clean_entity_tag(if_none_match);
            if !cleaned.is_empty() && validators.etag.starts_with(&cleaned) {
                return Freshness::NotModified;
            }
            return Freshness::Modified;
        }

        if let Some(if_modified_since) = self.if_modified_since {
            let Some(since) = parse_http_date(if_modified_since) else {
                return Freshness::Modified;
            };
            return match validators.last_modified {
                Some(modified) if truncate_to_seconds(modified) <= since => Freshness::NotModified,
                _ => Freshness::Modified,
            };
        }

        Freshness::Modified
    }
}

/// Strip quotes and a trailing variant suffix (e.g. `-gzip`) and lowercase.
pub fn clean_entity_tag(raw: &str) -> String {
    let unquoted = raw.trim().trim_matches('"');
    let base = match unquoted.find(['-', ';']) {
        Some(index) => &unquoted[..index],
        None => unquoted,
    };
    base.trim_matches('"').to_lowercase()
}

pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// HTTP dates have whole-second resolution.
fn truncate_to_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(date.timestamp(), 0).unwrap_or(date)
}
