//! In-process HTTP stub standing in for the forecast provider in tests.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub(crate) enum StubReply {
    /// 200 with a JSON body.
    Json(String),
    /// 200 with an arbitrary body.
    Body(String),
    Status(u16, String),
    /// 200 with a JSON body, sent after a pause.
    Delayed(Duration, String),
    /// Reads the request and never answers.
    Hang,
}

pub(crate) struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub(crate) async fn start(reply: StubReply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let reply = Arc::new(reply);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task = tokio::spawn({
            let requests = requests.clone();
            async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    let reply = reply.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut stream).await;
                        requests.lock().unwrap().push(head);
                        match &*reply {
                            StubReply::Json(body) | StubReply::Body(body) => {
                                respond(&mut stream, 200, body).await
                            }
                            StubReply::Status(status, body) => {
                                respond(&mut stream, *status, body).await
                            }
                            StubReply::Delayed(pause, body) => {
                                tokio::time::sleep(*pause).await;
                                respond(&mut stream, 200, body).await
                            }
                            StubReply::Hang => tokio::time::sleep(Duration::from_secs(60)).await,
                        }
                    });
                }
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            task,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A base URL nothing listens on.
pub(crate) async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A provider payload with `hours` hourly entries starting at the hour of `start`.
pub(crate) fn stormglass_body(start: DateTime<Utc>, hours: usize) -> String {
    let start = crate::synthetic::start_of_hour(start);
    let hours: Vec<_> = (0..hours)
        .map(|i| {
            let time = start + TimeDelta::hours(i as i64);
            json!({
                "time": time.to_rfc3339(),
                "waveHeight": {"sg": 1.5, "noaa": 1.4},
                "wavePeriod": {"sg": 11.0},
                "waveDirection": {"sg": 285.0},
                "windSpeed": {"sg": 4.2},
                "windDirection": {"sg": 90.0},
                "swellHeight": {"sg": 1.2},
                "swellPeriod": {"sg": 12.5},
                "waterTemperature": {"sg": 17.3},
                "seaLevel": {"sg": 0.6}
            })
        })
        .collect();
    json!({ "hours": hours, "meta": {"cost": 1, "dailyQuota": 10} }).to_string()
}

async fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        402 => "Payment Required",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
