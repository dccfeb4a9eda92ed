use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::query::SearchRequest;

/// Parsing mode the backend applies to the free-text query.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    Keywords,
    #[default]
    Phrase,
    Web,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Keywords => "keywords",
            QueryKind::Phrase => "phrase",
            QueryKind::Web => "web",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "keywords" => Ok(QueryKind::Keywords),
            "phrase" => Ok(QueryKind::Phrase),
            "web" => Ok(QueryKind::Web),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// The closed set of seasons the archive knows about.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Season {
    AutumnInHieron,
    Marielda,
    WinterInHieron,
    SpringInHieron,
    Counterweight,
    TwilightMirage,
    RoadToPartizan,
    Partizan,
    RoadToPalisade,
    Palisade,
    Sangfielle,
    Extras,
    Patreon,
    Other,
}

impl Season {
    pub const ALL: [Season; 14] = [
        Season::AutumnInHieron,
        Season::Marielda,
        Season::WinterInHieron,
        Season::SpringInHieron,
        Season::Counterweight,
        Season::TwilightMirage,
        Season::RoadToPartizan,
        Season::Partizan,
        Season::RoadToPalisade,
        Season::Palisade,
        Season::Sangfielle,
        Season::Extras,
        Season::Patreon,
        Season::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::AutumnInHieron => "autumn-in-hieron",
            Season::Marielda => "marielda",
            Season::WinterInHieron => "winter-in-hieron",
            Season::SpringInHieron => "spring-in-hieron",
            Season::Counterweight => "counterweight",
            Season::TwilightMirage => "twilight-mirage",
            Season::RoadToPartizan => "road-to-partizan",
            Season::Partizan => "partizan",
            Season::RoadToPalisade => "road-to-palisade",
            Season::Palisade => "palisade",
            Season::Sangfielle => "sangfielle",
            Season::Extras => "extras",
            Season::Patreon => "patreon",
            Season::Other => "other",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Season::ALL
            .iter()
            .copied()
            .find(|season| season.as_str() == id)
            .ok_or_else(|| ValidationError::UnknownSeason(id.to_string()))
    }
}

/// A contiguous run of sentence text, tagged with whether it matched the query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub highlighted: bool,
}

impl Span {
    pub fn new(text: impl Into<String>, highlighted: bool) -> Span {
        Span {
            text: text.into(),
            highlighted,
        }
    }
}

/// Spans in order; their texts concatenate to the original sentence.
pub type Sentence = Vec<Span>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    // the live backend calls this `curiosity_id` and sends it as a number
    #[serde(alias = "curiosity_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    pub season: String,
    #[serde(default)]
    pub docs_id: Option<String>,
    #[serde(default)]
    pub highlights: Vec<Sentence>,
}

impl EpisodeResult {
    pub fn docs_url(&self) -> Option<String> {
        self.docs_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://docs.google.com/document/d/{id}"))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub episodes: Vec<EpisodeResult>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl SearchResponse {
    pub fn has_more(&self) -> bool {
        self.next_page.as_deref().is_some_and(|cursor| !cursor.is_empty())
    }

    /// The request for the page after this one, if the backend handed out a cursor.
    pub fn next_request(&self) -> Option<SearchRequest> {
        if !self.has_more() {
            return None;
        }
        self.next_page.clone().map(SearchRequest::follow_up)
    }
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    #[serde(default)]
    pub err: bool,
    pub kind: String,
    pub msg: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(id) => id,
        IdRepr::Number(id) => id.to_string(),
    })
}

#[test]
fn test_season_ids_round_trip_through_from_str() {
    for season in Season::ALL {
        assert_eq!(season.as_str().parse::<Season>(), Ok(season));
        let json = serde_json::to_string(&season).unwrap();
        assert_eq!(json, format!("\"{}\"", season.as_str()));
    }
    assert_eq!(
        "atlas-vein".parse::<Season>(),
        Err(ValidationError::UnknownSeason("atlas-vein".to_string()))
    );
}

#[test]
fn test_episode_accepts_backend_field_names() {
    let ep: EpisodeResult = serde_json::from_str(
        r#"{"curiosity_id": 42, "slug": "the-beacon", "title": "The Beacon", "season": "palisade"}"#,
    )
    .unwrap();
    assert_eq!(ep.id, "42");
    assert_eq!(ep.slug.as_deref(), Some("the-beacon"));
    assert!(ep.docs_id.is_none());
    assert!(ep.docs_url().is_none());
    assert!(ep.highlights.is_empty());

    let ep: EpisodeResult = serde_json::from_str(
        r#"{"id": "ep-7", "title": "t", "season": "sangfielle", "docs_id": "abc", "highlights": []}"#,
    )
    .unwrap();
    assert_eq!(ep.id, "ep-7");
    assert_eq!(
        ep.docs_url().as_deref(),
        Some("https://docs.google.com/document/d/abc")
    );
}

#[test]
fn test_next_request_only_when_cursor_present() {
    let done = SearchResponse {
        episodes: vec![],
        next_page: None,
    };
    assert!(!done.has_more());
    assert!(done.next_request().is_none());

    let blank = SearchResponse {
        episodes: vec![],
        next_page: Some(String::new()),
    };
    assert!(blank.next_request().is_none());

    let more = SearchResponse {
        episodes: vec![],
        next_page: Some("abc".to_string()),
    };
    let next = more.next_request().unwrap();
    assert_eq!(next.page(), Some("abc"));
}
