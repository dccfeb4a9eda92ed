use crate::data_models::{QueryKind, Season};
use crate::error::{SearchResult, ValidationError};
use crate::set_eq::unordered_eq;

/// Season selection the UI offers for "no restriction".
pub const ALL_SEASONS_SENTINEL: &str = "all-seasons";
/// Largest page the backend will serve.
pub const MAX_PAGE_SIZE: usize = 100;

/// Whatever the caller managed to collect from the user; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSearchInput {
    pub query: Option<String>,
    pub kind: Option<QueryKind>,
    pub seasons: Option<Vec<String>>,
    pub highlight: Option<bool>,
    pub page: Option<String>,
    pub page_size: Option<usize>,
}

impl PartialSearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cursor(cursor: impl Into<String>) -> Self {
        Self::new().page(cursor)
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn kind(mut self, kind: QueryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn seasons<I, S>(mut self, seasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasons = Some(seasons.into_iter().map(Into::into).collect());
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn page(mut self, cursor: impl Into<String>) -> Self {
        self.page = Some(cursor.into());
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Canonical, validated request. Built once per user action and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    kind: QueryKind,
    seasons: Vec<Season>,
    highlight: bool,
    page: Option<String>,
    page_size: Option<usize>,
}

impl SearchRequest {
    /// Request for the page behind `cursor`. The cursor carries the original
    /// query and filters, so nothing else is resent.
    pub fn follow_up(cursor: impl Into<String>) -> SearchRequest {
        let cursor = cursor.into();
        SearchRequest {
            query: String::new(),
            kind: QueryKind::default(),
            seasons: Vec::new(),
            highlight: true,
            page: Some(cursor).filter(|c| !c.is_empty()),
            page_size: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Empty means every season.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn is_first_page(&self) -> bool {
        self.page.is_none()
    }

    /// Flat key/value pairs ready for query-string encoding.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let seasons = self
            .seasons
            .iter()
            .map(Season::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut params = vec![
            ("query", self.query.clone()),
            ("kind", self.kind.as_str().to_string()),
            ("seasons", seasons),
            ("highlight", self.highlight.to_string()),
        ];

        if let Some(page) = &self.page {
            params.push(("page", page.clone()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("page_size", page_size.to_string()));
        }

        params
    }
}

/// Normalize partial input into a [`SearchRequest`].
///
/// Defaults apply only to fields that are absent: an explicit `highlight: false`
/// is kept. Unknown season identifiers fail the whole build.
pub fn build(input: PartialSearchInput) -> SearchResult<SearchRequest> {
    let seasons = normalize_seasons(input.seasons.unwrap_or_default())?;
    let page_size = input.page_size.map(validate_page_size).transpose()?;

    Ok(SearchRequest {
        query: input.query.unwrap_or_default(),
        kind: input.kind.unwrap_or_default(),
        seasons,
        highlight: input.highlight.unwrap_or(true),
        page: input.page.filter(|page| !page.is_empty()),
        page_size,
    })
}

// the backend pages while `results >= page_size`, so 0 would never end
fn validate_page_size(page_size: usize) -> Result<usize, ValidationError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::InvalidPageSize(page_size));
    }
    Ok(page_size)
}

fn normalize_seasons(raw: Vec<String>) -> Result<Vec<Season>, ValidationError> {
    let mut seasons = Vec::with_capacity(raw.len());
    let mut all_selected = false;

    for id in raw.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if id == ALL_SEASONS_SENTINEL {
            all_selected = true;
            continue;
        }
        seasons.push(id.parse::<Season>()?);
    }
    seasons.sort_unstable();
    seasons.dedup();

    if all_selected || unordered_eq(&seasons, &Season::ALL) {
        return Ok(Vec::new());
    }

    Ok(seasons)
}
