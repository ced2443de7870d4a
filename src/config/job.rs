use serde::Deserialize;

use crate::render::Alignment;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
    /// Run report path, relative to the job file directory. Defaults to
    /// the settings `report_filename`.
    #[serde(default)]
    pub report: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Directory of rasterized page images.
    pub input: String,
    /// Sidecar JSON with precomputed detections.
    pub detections: String,
    /// Output directory for modified pages.
    pub output: String,
    /// Optional 1-based page subset; other pages pass through unmodified.
    #[serde(default, deserialize_with = "deserialize_pages_opt")]
    pub pages: Option<Vec<u32>>,
    pub padding: Option<u32>,
    pub min_font_size: Option<u32>,
    pub alignment: Option<Alignment>,
}

/// Parse a page range string into sorted, deduplicated page numbers.
///
/// Accepted forms:
/// - single page: `"5"`
/// - range: `"5-10"` (5, 6, 7, 8, 9, 10)
/// - mixed, comma separated: `"1, 3, 5-10, 15"`
pub fn parse_page_range(s: &str) -> crate::error::Result<Vec<u32>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(crate::error::PageTranslateError::config(
            "Page range cannot be empty",
        ));
    }

    let mut pages = Vec::new();

    for part in trimmed.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let start: u32 = start_str.trim().parse().map_err(|_| {
                crate::error::PageTranslateError::config(format!(
                    "Invalid page number in range: '{start_str}'"
                ))
            })?;
            let end: u32 = end_str.trim().parse().map_err(|_| {
                crate::error::PageTranslateError::config(format!(
                    "Invalid page number in range: '{end_str}'"
                ))
            })?;

            if start > end {
                return Err(crate::error::PageTranslateError::config(format!(
                    "Invalid page range: start ({start}) > end ({end})"
                )));
            }

            for page in start..=end {
                pages.push(page);
            }
        } else {
            let page: u32 = part.parse().map_err(|_| {
                crate::error::PageTranslateError::config(format!("Invalid page number: '{part}'"))
            })?;
            pages.push(page);
        }
    }

    if pages.is_empty() {
        return Err(crate::error::PageTranslateError::config(
            "Page range resolved to empty set",
        ));
    }

    pages.sort();
    pages.dedup();
    Ok(pages)
}

fn deserialize_pages_opt<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse_page_range(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
