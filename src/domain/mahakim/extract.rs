// src/domain/mahakim/extract.rs
//! Label-based extraction from the portal's result fragment.
//!
//! The portal has no versioned contract; these patterns track its current
//! markup and will break when it changes. Callers always keep the raw
//! fragment next to whatever is extracted here.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static NOISE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b.*?</(script|style)>").expect("valid noise regex")
});

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static STATUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:حالة الملف|الحالة|\bStatut\b|\bÉtat\b)\s*:?\s*([^\n]+)").expect("valid statut regex")
});

static PROCHAINE_AUDIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:الجلسة المقبلة|تاريخ الجلسة المقبلة|تاريخ الجلسة|Prochaine audience)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})",
    )
    .expect("valid audience regex")
});

static JUGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:القاضي المقرر|المستشار المقرر|\bJuge rapporteur\b|\bJuge\b)\s*:?\s*([^\n]+)")
        .expect("valid juge regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortalExtract {
    pub statut: Option<String>,
    pub prochaine_audience: Option<NaiveDate>,
    pub juge: Option<String>,
}

impl PortalExtract {
    pub fn is_empty(&self) -> bool {
        self.statut.is_none() && self.prochaine_audience.is_none() && self.juge.is_none()
    }
}

pub fn extract_fields(html: &str) -> PortalExtract {
    let text = visible_text(html);
    PortalExtract {
        statut: capture_value(&STATUT, &text),
        prochaine_audience: PROCHAINE_AUDIENCE
            .captures(&text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_portal_date(m.as_str())),
        juge: capture_value(&JUGE, &text),
    }
}

/// Flatten markup to one trimmed text node per line.
fn visible_text(html: &str) -> String {
    let without_noise = NOISE_BLOCKS.replace_all(html, "");
    let flattened = TAGS.replace_all(&without_noise, "\n");
    let decoded = flattened
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn capture_value(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(1)?.as_str().trim();
    let value = value.trim_start_matches(':').trim();
    if value.is_empty() || value.ends_with(':') {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_portal_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}
