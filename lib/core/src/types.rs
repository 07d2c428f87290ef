use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination parameters accepted by every list endpoint.
///
/// Deliberately forgiving: a missing, non-numeric, or out-of-range value
/// silently falls back to the default (`pageNum` 1, `pageSize` 10) instead
/// of surfacing an error. Out-of-range pages yield empty result sets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page_num", deserialize_with = "lenient_page_num")]
    pub page_num: u32,

    #[serde(default = "default_page_size", deserialize_with = "lenient_page_size")]
    pub page_size: u32,
}

fn default_page_num() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_num: default_page_num(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    pub fn new(page_num: u32, page_size: u32) -> Self {
        Self {
            page_num: if page_num < 1 { default_page_num() } else { page_num },
            page_size: if page_size < 1 { default_page_size() } else { page_size },
        }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page_num as usize - 1) * self.page_size as usize
    }

    /// Page size as a usize limit.
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// Query-string values arrive as strings; JSON bodies may carry numbers.
/// Accept both, and treat anything unparsable as "not provided".
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPageValue {
    Num(i64),
    Text(String),
}

fn lenient_page(raw: Result<RawPageValue, impl std::error::Error>, fallback: u32) -> u32 {
    let n = match raw {
        Ok(RawPageValue::Num(n)) => n,
        Ok(RawPageValue::Text(s)) => s.trim().parse::<i64>().unwrap_or(i64::from(fallback)),
        Err(_) => i64::from(fallback),
    };
    if n < 1 || n > i64::from(u32::MAX) {
        fallback
    } else {
        n as u32
    }
}

fn lenient_page_num<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(lenient_page(RawPageValue::deserialize(d), default_page_num()))
}

fn lenient_page_size<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(lenient_page(RawPageValue::deserialize(d), default_page_size()))
}

/// Apply pagination to an already-materialised list.
///
/// Used where the page is cut after a batch lookup (follow lists, recent
/// views); SQL-backed listings push LIMIT/OFFSET down instead.
pub fn paginate<T>(items: Vec<T>, page: &PageParams) -> Vec<T> {
    let from = page.offset();
    if from >= items.len() {
        return Vec::new();
    }
    items.into_iter().skip(from).take(page.limit()).collect()
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Id / time helpers
// ---------------------------------------------------------------------------

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
