#![allow(dead_code)]

use monsterflow::{CatalogEntry, MonsterSource, PipelineError, RawDetail};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

// In-memory monster source with per-reference failure injection.
pub struct FakeSource {
    catalog: Vec<CatalogEntry>,
    catalog_failures: Mutex<usize>,
    details: BTreeMap<String, Value>,
    detail_failures: Mutex<BTreeMap<String, usize>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            catalog: entries
                .iter()
                .map(|(name, reference)| CatalogEntry::new(*name, *reference))
                .collect(),
            catalog_failures: Mutex::new(0),
            details: BTreeMap::new(),
            detail_failures: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_detail(mut self, reference: &str, detail: Value) -> Self {
        self.details.insert(reference.to_string(), detail);
        self
    }

    /// Fail the next `times` detail fetches for `reference` with a 503.
    pub fn failing_detail(self, reference: &str, times: usize) -> Self {
        self.detail_failures
            .lock()
            .unwrap()
            .insert(reference.to_string(), times);
        self
    }

    pub fn failing_catalog(self, times: usize) -> Self {
        *self.catalog_failures.lock().unwrap() = times;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn unavailable(url: &str) -> PipelineError {
        PipelineError::RemoteFetch {
            url: url.to_string(),
            status: Some(503),
            reason: "HTTP status 503 Service Unavailable".to_string(),
        }
    }
}

impl MonsterSource for FakeSource {
    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, PipelineError> {
        self.calls.lock().unwrap().push("catalog".to_string());
        let mut remaining = self.catalog_failures.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(Self::unavailable("/api/monsters"));
        }
        Ok(self.catalog.clone())
    }

    fn fetch_detail(&self, reference: &str) -> Result<RawDetail, PipelineError> {
        self.calls.lock().unwrap().push(reference.to_string());
        if let Some(remaining) = self.detail_failures.lock().unwrap().get_mut(reference) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Self::unavailable(reference));
            }
        }
        match self.details.get(reference) {
            Some(Value::Object(map)) => Ok(map.clone()),
            _ => Err(PipelineError::RemoteFetch {
                url: reference.to_string(),
                status: Some(404),
                reason: "HTTP status 404 Not Found".to_string(),
            }),
        }
    }
}

pub fn goblin_detail(name: &str) -> Value {
    json!({
        "index": name.to_lowercase(),
        "name": name,
        "hit_points": 7,
        "armor_class": [{"type": "armor", "value": 15}],
        "actions": [{"name": "Scimitar", "desc": "Melee attack"}]
    })
}

pub fn catalog_body(entries: &[(&str, &str)]) -> String {
    let results: Vec<Value> = entries
        .iter()
        .map(|(name, url)| json!({"index": name.to_lowercase(), "name": name, "url": url}))
        .collect();
    json!({"count": results.len(), "results": results}).to_string()
}

// Minimal HTTP/1.1 server answering canned responses by request path.
pub struct StubServer {
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(routes: BTreeMap<String, (u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    continue;
                };
                let Some(path) = read_request_path(&stream) else {
                    continue;
                };
                log.lock().unwrap().push(path.clone());
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| (404, r#"{"error":"Not found"}"#.to_string()));
                respond(stream, status, &body);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, path: &str) -> usize {
        self.hits().iter().filter(|hit| hit.as_str() == path).count()
    }
}

pub fn routes(pairs: Vec<(&str, u16, String)>) -> BTreeMap<String, (u16, String)> {
    pairs
        .into_iter()
        .map(|(path, status, body)| (path.to_string(), (status, body)))
        .collect()
}

fn read_request_path(stream: &TcpStream) -> Option<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    // Drain headers so closing the socket does not reset the connection.
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    request_line.split_whitespace().nth(1).map(str::to_string)
}

fn respond(mut stream: TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
