/// Deterministic `WebSearchProvider` stub returning fixed or configured
/// results, so the information responder's web-context assembly can be
/// exercised without a live search backend.
use async_trait::async_trait;
use replyforge_core::{ProviderError, WebSearchProvider, WebSearchResult};

pub struct MockWebSearchProvider {
    results: Vec<WebSearchResult>,
}

impl MockWebSearchProvider {
    pub fn new() -> Self {
        Self {
            results: vec![WebSearchResult {
                title: "Mock result".to_string(),
                snippet: "This is a placeholder search result for local demos.".to_string(),
                link: "https://mock.search.example/result".to_string(),
            }],
        }
    }

    pub fn with_results(results: Vec<WebSearchResult>) -> Self {
        Self { results }
    }
}

impl Default for MockWebSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearchProvider for MockWebSearchProvider {
    async fn search(&self, _query: &str) -> Result<Vec<WebSearchResult>, ProviderError> {
        Ok(self.results.clone())
    }
}
