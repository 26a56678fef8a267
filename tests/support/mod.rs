//! Shared test doubles for behavior tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ferrofolio_core::{
    Converter, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, RetryConfig, Settings,
};
use serde_json::json;

pub const ACCOUNT_ID: &str = "3f1c9a52-acc0-4d7e-9b1a-5c2f0e8d4b11";

/// In-memory symbol-lookup service.
///
/// Answers token requests with a fresh token every time, serves lookup
/// queries from a catalog, and records every request it sees. Scripted
/// lookup responses are consumed first, in order.
#[derive(Default)]
pub struct LookupServiceDouble {
    catalog: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    scripted: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl LookupServiceDouble {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a candidate returned for `query`, after any already registered.
    pub fn add_candidate(&self, query: &str, symbol: &str, currency: &str) {
        self.catalog
            .lock()
            .expect("catalog lock")
            .entry(query.to_owned())
            .or_default()
            .push(json!({
                "symbol": symbol,
                "currency": currency,
                "dataSource": "YAHOO",
                "name": query,
            }));
    }

    /// Queues a response for the next lookup request, ahead of the catalog.
    pub fn script_lookup(&self, response: Result<HttpResponse, HttpError>) {
        self.scripted
            .lock()
            .expect("script lock")
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Decoded `query` parameters of every lookup request, in order.
    pub fn lookup_queries(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|request| request.method == HttpMethod::Get)
            .filter_map(|request| request.url.split_once("query=").map(|(_, query)| query))
            .map(|query| {
                urlencoding::decode(query)
                    .expect("utf-8 query")
                    .into_owned()
            })
            .collect()
    }

    pub fn lookups_for(&self, query: &str) -> usize {
        self.lookup_queries()
            .iter()
            .filter(|seen| seen.as_str() == query)
            .count()
    }

    pub fn token_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == HttpMethod::Post)
            .count()
    }

    fn respond(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        if request.method == HttpMethod::Post {
            let issued = self.token_requests();
            return Ok(HttpResponse::ok_json(
                json!({ "authToken": format!("token-{issued}") }).to_string(),
            ));
        }

        if let Some(scripted) = self.scripted.lock().expect("script lock").pop_front() {
            return scripted;
        }

        let query = request
            .url
            .split_once("query=")
            .map(|(_, query)| urlencoding::decode(query).map(|q| q.into_owned()))
            .transpose()
            .map_err(|error| HttpError::non_retryable(error.to_string()))?
            .unwrap_or_default();
        let items = self
            .catalog
            .lock()
            .expect("catalog lock")
            .get(&query)
            .cloned()
            .unwrap_or_default();
        Ok(HttpResponse::ok_json(json!({ "items": items }).to_string()))
    }
}

impl HttpClient for LookupServiceDouble {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            // Suspend once so concurrent callers interleave.
            tokio::task::yield_now().await;
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            self.respond(&request)
        })
    }
}

/// Settings with an account id and an instant three-attempt retry budget.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default().with_account_id(ACCOUNT_ID);
    settings.lookup.base_url = String::from("http://lookup.test");
    settings.lookup.access_token = String::from("test-secret");
    settings.lookup.retry = RetryConfig::fixed(Duration::ZERO, 3);
    settings
}

pub fn converter(service: &Arc<LookupServiceDouble>) -> Converter {
    converter_with(test_settings(), service)
}

pub fn converter_with(settings: Settings, service: &Arc<LookupServiceDouble>) -> Converter {
    let http: Arc<dyn HttpClient> = service.clone();
    Converter::with_http(settings, http)
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/../../tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|error| panic!("fixture {path}: {error}"))
}
