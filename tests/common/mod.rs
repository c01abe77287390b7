//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use storage_drivers::{
    ConfigOverrides, DriverConfig, FileObject, FileResult, StorageDriver, StorageError,
};

/// A request seen by [`CannedServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP server answering each connection with the next canned response
pub struct CannedServer {
    pub url: String,
    requests: Receiver<RecordedRequest>,
}

impl CannedServer {
    /// Serve `responses` in order, one connection each
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        headers.push((name.trim().to_string(), value.trim().to_string()));
                    }
                }

                let length = headers
                    .iter()
                    .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut request_body = vec![0u8; length];
                reader.read_exact(&mut request_body).unwrap();

                let is_head = method == "HEAD";
                let _ = tx.send(RecordedRequest {
                    method,
                    path,
                    headers,
                    body: request_body,
                });

                let mut stream = reader.into_inner();
                let payload = if is_head { "" } else { body };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    payload.len(),
                    payload
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });

        Self { url, requests: rx }
    }

    /// Next request the server received
    pub fn next_request(&self) -> RecordedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("server saw no request")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Driver whose existence probe is scripted, for exercising the pipeline
pub struct ScriptedDriver {
    pub config: DriverConfig,
    pub file: Option<FileObject>,
    pub probe: Result<bool, fn() -> StorageError>,
    pub probes: std::cell::Cell<usize>,
    pub writes: usize,
}

impl ScriptedDriver {
    pub fn existing(exists: bool) -> Self {
        Self {
            config: DriverConfig::default(),
            file: None,
            probe: Ok(exists),
            probes: std::cell::Cell::new(0),
            writes: 0,
        }
    }

    pub fn failing(error: fn() -> StorageError) -> Self {
        Self {
            probe: Err(error),
            ..Self::existing(false)
        }
    }
}

impl StorageDriver for ScriptedDriver {
    fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut DriverConfig {
        &mut self.config
    }

    fn file_object(&self) -> Option<&FileObject> {
        self.file.as_ref()
    }

    fn set_file_object(&mut self, file: FileObject) {
        self.file = Some(file);
    }

    fn check_config(&self) -> Result<(), StorageError> {
        let strict = self.config.extra.contains_key("strict");
        if strict && self.config.get_str("required").is_none() {
            return Err(StorageError::ConfigInvalid("required is missing".to_string()));
        }
        Ok(())
    }

    fn save(&mut self) -> FileResult {
        let checked = self.before_save();
        if !checked.success {
            return checked;
        }
        self.writes += 1;
        FileResult::ok("file saved")
    }

    fn del(&self, path: &str) -> FileResult {
        FileResult::ok("file deleted").with_path(path)
    }

    fn has(&self, path: &str) -> FileResult {
        self.probes.set(self.probes.get() + 1);
        match self.probe {
            Ok(exists) => FileResult::existence(path, exists),
            Err(error) => FileResult::failure(&error()).with_path(path),
        }
    }
}

/// Overrides pointing a driver at `dir`
pub fn save_path(dir: &std::path::Path) -> ConfigOverrides {
    ConfigOverrides::new().with_save_path(dir.to_string_lossy())
}
