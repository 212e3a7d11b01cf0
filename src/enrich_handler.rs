// src/enrich_handler.rs
use std::fmt;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::config::Endpoints;
use crate::data_types::Record;
use crate::file_handler::SelectedFile;

/// Multipart field name both enrichment services expect.
const FILE_FIELD: &str = "employeeFile";

#[derive(Debug, Clone)]
pub enum EnrichError {
    /// Transport-level failure: connection refused, DNS, request build.
    Request(String),
    /// The service answered with a non-2xx status.
    Status(u16),
    /// The body was not a JSON array of records.
    MalformedBody(String),
}

impl fmt::Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichError::Request(msg) => write!(f, "request failed: {}", msg),
            EnrichError::Status(code) => write!(f, "service returned HTTP {}", code),
            EnrichError::MalformedBody(msg) => write!(f, "unexpected response body: {}", msg),
        }
    }
}

impl std::error::Error for EnrichError {}

/// HTTP client for the two enrichment services. One underlying
/// `reqwest::Client` is shared by every request.
#[derive(Debug, Clone)]
pub struct EnrichHandler {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl EnrichHandler {
    pub fn new(endpoints: Endpoints) -> Self {
        EnrichHandler {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    /// Primary upload: submits the file to endpoint A.
    pub async fn enrich(self, file: SelectedFile) -> Result<Vec<Record>, EnrichError> {
        self.submit(self.endpoints.primary_enrich_url(), file).await
    }

    /// Re-run: submits the snapshot of the last uploaded file to endpoint B.
    pub async fn rerun(self, file: SelectedFile) -> Result<Vec<Record>, EnrichError> {
        self.submit(self.endpoints.rerun_enrich_url(), file).await
    }

    async fn submit(&self, url: String, file: SelectedFile) -> Result<Vec<Record>, EnrichError> {
        debug!("submitting {} ({} bytes) to {}", file.name, file.bytes.len(), url);

        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|err| EnrichError::Request(err.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| EnrichError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| EnrichError::Request(err.to_string()))?;
        let records: Vec<Record> = serde_json::from_str(&body)
            .map_err(|err| EnrichError::MalformedBody(err.to_string()))?;

        info!("enrichment returned {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_handler::CSV_MIME;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn sample_file() -> SelectedFile {
        SelectedFile {
            name: "team.csv".to_string(),
            mime: CSV_MIME.to_string(),
            bytes: b"name,score\nAlice,90\n".to_vec(),
        }
    }

    fn handler_for(base: &str) -> EnrichHandler {
        EnrichHandler::new(Endpoints {
            primary: base.to_string(),
            rerun: base.to_string(),
        })
    }

    /// Serves exactly one canned HTTP response and hands back the raw
    /// request bytes for inspection.
    async fn one_shot_server(status: u16, body: &'static str) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn successful_upload_parses_the_record_array() {
        let (base, server) = one_shot_server(
            200,
            r#"[{"name":"Alice","score":90},{"name":"Bob","score":80}]"#,
        )
        .await;

        let records = handler_for(&base).enrich(sample_file()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Alice");
        assert_eq!(records[1]["score"], 80);

        let request = server.await.unwrap();
        let raw = String::from_utf8_lossy(&request);
        assert!(raw.starts_with("POST /api/enrich"));
        assert!(raw.contains("name=\"employeeFile\""));
        assert!(raw.contains("filename=\"team.csv\""));
        assert!(raw.contains("name,score"));
    }

    #[tokio::test]
    async fn empty_array_is_a_success_with_no_records() {
        let (base, _server) = one_shot_server(200, "[]").await;
        let records = handler_for(&base).enrich(sample_file()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_error_maps_to_the_status_variant() {
        let (base, _server) = one_shot_server(500, "oops").await;
        let err = handler_for(&base).rerun(sample_file()).await.unwrap_err();
        assert!(matches!(err, EnrichError::Status(500)));
    }

    #[tokio::test]
    async fn non_array_body_is_malformed() {
        let (base, _server) = one_shot_server(200, r#"{"rows": []}"#).await;
        let err = handler_for(&base).enrich(sample_file()).await.unwrap_err();
        assert!(matches!(err, EnrichError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = handler_for(&base).enrich(sample_file()).await.unwrap_err();
        assert!(matches!(err, EnrichError::Request(_)));
    }
}
