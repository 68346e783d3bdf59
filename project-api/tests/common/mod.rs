#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use project_api::{ApiError, ApiRequest, ProjectApi, RawResponse, Transport};
use reqwest::Method;
use serde_json::{Value, json};
use url::Url;

pub const ADDRESS: &str = "http://lms.example.com";

const COLLECTIONS: [&str; 2] = ["peer_reviews", "workgroup_reviews"];

/// In-memory stand-in for the API server. Review collections behave like the real thing;
/// everything else answers from canned routes keyed by path and query.
#[derive(Default)]
pub struct FakeRemote {
    state: RefCell<State>,
}

#[derive(Default)]
struct State {
    records: HashMap<&'static str, BTreeMap<u64, Value>>,
    next_id: u64,
    routes: HashMap<String, (u16, String)>,
    calls: Vec<(Method, String)>,
    writes_before_failure: Option<usize>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ProjectApi<&Self> {
        ProjectApi::new(Url::parse(ADDRESS).unwrap(), self)
    }

    pub fn route(&self, path_and_query: &str, status: u16, body: Value) {
        self.route_raw(path_and_query, status, body.to_string());
    }

    pub fn route_raw(&self, path_and_query: &str, status: u16, body: impl Into<String>) {
        self.state
            .borrow_mut()
            .routes
            .insert(path_and_query.to_owned(), (status, body.into()));
    }

    /// Stores a record directly, as if someone else had written it.
    pub fn seed(&self, collection: &'static str, record: Value) {
        let mut state = self.state.borrow_mut();
        let id = record["id"].as_u64().expect("seeded records need an id");
        state.next_id = state.next_id.max(id);
        state.records.entry(collection).or_default().insert(id, record);
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.state
            .borrow()
            .records
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_with(&self, method: Method) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, url)| url)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Lets `writes` more writes through, then fails every write as a transport error.
    pub fn fail_writes_after(&self, writes: usize) {
        self.state.borrow_mut().writes_before_failure = Some(writes);
    }

    fn handle(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = request.url();
        let mut state = self.state.borrow_mut();
        state.calls.push((request.method().clone(), url.to_string()));

        if *request.method() != Method::GET {
            if let Some(remaining) = state.writes_before_failure.as_mut() {
                if *remaining == 0 {
                    return Err(ApiError::transport(url.as_str(), "connection reset"));
                }
                *remaining -= 1;
            }
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let response = match (request.method(), segments.as_slice()) {
            (&Method::GET, ["api", "server", "workgroups", group, collection])
                if COLLECTIONS.contains(collection) =>
            {
                let collection = collection_name(collection);
                let content_id = url
                    .query_pairs()
                    .find(|(key, _)| key == "content_id")
                    .map(|(_, value)| value.into_owned());
                let group: u64 = group.parse().unwrap();
                let listed: Vec<Value> = state
                    .records
                    .get(collection)
                    .into_iter()
                    .flat_map(|records| records.values())
                    .filter(|record| record["workgroup"].as_u64() == Some(group))
                    .filter(|record| record["content_id"].as_str() == content_id.as_deref())
                    .cloned()
                    .collect();
                RawResponse::new(200, Value::from(listed).to_string())
            }
            (&Method::POST, ["api", "server", collection]) if COLLECTIONS.contains(collection) => {
                let collection = collection_name(collection);
                state.next_id += 1;
                let id = state.next_id;
                let mut record = request.body().cloned().unwrap_or(json!({}));
                record["id"] = json!(id);
                record["created"] = json!("2015-01-01T00:00:00Z");
                record["modified"] = json!("2015-01-01T00:00:00Z");
                state
                    .records
                    .entry(collection)
                    .or_default()
                    .insert(id, record.clone());
                RawResponse::new(201, record.to_string())
            }
            (&Method::PUT, ["api", "server", collection, id]) if COLLECTIONS.contains(collection) => {
                let collection = collection_name(collection);
                let id: u64 = id.parse().unwrap();
                let records = state.records.entry(collection).or_default();
                match records.get_mut(&id) {
                    Some(stored) => {
                        let mut record = request.body().cloned().unwrap_or(json!({}));
                        record["created"] = stored["created"].clone();
                        record["modified"] = json!("2015-01-02T00:00:00Z");
                        *stored = record.clone();
                        RawResponse::new(200, record.to_string())
                    }
                    None => RawResponse::new(404, r#"{"detail": "Not found"}"#),
                }
            }
            (&Method::DELETE, ["api", "server", collection, id])
                if COLLECTIONS.contains(collection) =>
            {
                let collection = collection_name(collection);
                let id: u64 = id.parse().unwrap();
                match state.records.entry(collection).or_default().remove(&id) {
                    Some(_) => RawResponse::new(204, ""),
                    None => RawResponse::new(404, r#"{"detail": "Not found"}"#),
                }
            }
            _ => {
                let key = match url.query() {
                    Some(query) => format!("{}?{query}", url.path()),
                    None => url.path().to_owned(),
                };
                match state.routes.get(&key) {
                    Some((status, body)) => RawResponse::new(*status, body.clone()),
                    None => RawResponse::new(404, format!("no route for {key}")),
                }
            }
        };

        Ok(response)
    }
}

fn collection_name(collection: &str) -> &'static str {
    COLLECTIONS
        .into_iter()
        .find(|name| *name == collection)
        .unwrap()
}

impl Transport for FakeRemote {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.handle(request)
    }
}

pub fn peer_record(id: u64, question: &str, answer: &str) -> Value {
    json!({
        "id": id,
        "question": question,
        "answer": answer,
        "workgroup": 12,
        "user": 5,
        "reviewer": "anon-reviewer",
        "content_id": "block@gp",
        "created": "2014-12-31T00:00:00Z",
        "modified": "2014-12-31T00:00:00Z",
    })
}

pub fn answers(pairs: &[(&str, &str)]) -> project_api::DesiredAnswers {
    pairs
        .iter()
        .map(|(question, answer)| (question.to_string(), answer.to_string()))
        .collect()
}
