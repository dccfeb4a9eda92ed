pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod highlight;
pub mod query;
pub mod set_eq;

pub use client::SearchClient;
pub use data_models::{EpisodeResult, QueryKind, SearchResponse, Season, Sentence, Span};
pub use error::{SearchError, SearchResult, TransportError, ValidationError};
pub use highlight::{Fragment, RenderedEpisode, Run, escape_regex, render, render_episode};
pub use query::{PartialSearchInput, SearchRequest, build};
pub use set_eq::unordered_eq;
