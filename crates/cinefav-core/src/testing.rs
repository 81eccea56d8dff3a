//! Scripted `OmdbApi` for unit tests.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use cinefav_api::omdb::{
    OmdbApi, OmdbSearchItem, OmdbSearchResponse, OmdbTitleResponse, SearchParams, TitleParams,
};

type SearchReply = Box<dyn Fn(&SearchParams) -> (Duration, Result<OmdbSearchResponse>) + Send + Sync>;
type TitleReply = Box<dyn Fn(&TitleParams) -> Result<OmdbTitleResponse> + Send + Sync>;

/// Records every call and answers from closures.
pub struct MockOmdbApi {
    search_calls: Mutex<Vec<SearchParams>>,
    title_calls: Mutex<Vec<TitleParams>>,
    on_search: SearchReply,
    on_title: TitleReply,
}

impl MockOmdbApi {
    /// Answers searches with `reply`, title lookups with an error.
    pub fn searching<F>(reply: F) -> Self
    where
        F: Fn(&SearchParams) -> (Duration, Result<OmdbSearchResponse>) + Send + Sync + 'static,
    {
        Self {
            search_calls: Mutex::new(Vec::new()),
            title_calls: Mutex::new(Vec::new()),
            on_search: Box::new(reply),
            on_title: Box::new(|_| bail!("title lookup not scripted")),
        }
    }

    /// Answers title lookups with `reply`, searches with an error.
    pub fn titles<F>(reply: F) -> Self
    where
        F: Fn(&TitleParams) -> Result<OmdbTitleResponse> + Send + Sync + 'static,
    {
        Self {
            on_title: Box::new(reply),
            ..Self::searching(|_| (Duration::ZERO, Err(anyhow::anyhow!("search not scripted"))))
        }
    }

    pub fn search_calls(&self) -> Vec<SearchParams> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn title_calls(&self) -> Vec<TitleParams> {
        self.title_calls.lock().unwrap().clone()
    }
}

impl OmdbApi for MockOmdbApi {
    async fn search(&self, params: &SearchParams) -> Result<OmdbSearchResponse> {
        self.search_calls.lock().unwrap().push(params.clone());
        let (delay, reply) = (self.on_search)(params);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    async fn title(&self, params: &TitleParams) -> Result<OmdbTitleResponse> {
        self.title_calls.lock().unwrap().push(params.clone());
        (self.on_title)(params)
    }
}

/// A successful search page of `count` items out of `total`.
///
/// Ids encode the query prefix and the page so pages are distinguishable.
pub fn page(params: &SearchParams, count: u32, total: u32) -> OmdbSearchResponse {
    OmdbSearchResponse {
        response: String::from("True"),
        search: (0..count)
            .map(|i| OmdbSearchItem {
                imdb_id: format!("tt{}{:03}{i:02}", params.query.len(), params.page),
                title: format!("{} {} #{i}", params.query, params.page),
                year: String::from("2005"),
                kind: Some(String::from("movie")),
                poster: Some(String::from("N/A")),
            })
            .collect(),
        total_results: Some(total.to_string()),
        error: None,
    }
}

/// OMDb's "no match" envelope.
pub fn not_found(message: &str) -> OmdbSearchResponse {
    OmdbSearchResponse {
        response: String::from("False"),
        search: Vec::new(),
        total_results: None,
        error: Some(String::from(message)),
    }
}
