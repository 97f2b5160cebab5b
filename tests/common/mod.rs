//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::pending;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use upstream_reloader::deploy::{DeployError, Deployer};
use upstream_reloader::discovery::{FetchError, ServiceClient, ServiceDescriptor};

/// Start a mock descriptor API that answers every request with `status` and
/// `body`. Returns its address and the raw request heads it received.
pub async fn start_descriptor_backend(
    status: u16,
    body: &'static str,
) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }
                        seen.lock().unwrap().push(String::from_utf8_lossy(&head).into_owned());

                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}

pub fn link_vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Scripted answer for one descriptor URL.
#[derive(Clone)]
pub enum Scripted {
    Vars(HashMap<String, String>),
    Fail,
    Hang,
}

/// In-memory [`ServiceClient`] whose answers can change between cycles.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    answers: Arc<Mutex<HashMap<String, Scripted>>>,
    fetches: Arc<AtomicUsize>,
    auth_seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    pub fn set(&self, url: &str, answer: Scripted) {
        self.answers.lock().unwrap().insert(url.to_string(), answer);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn auth_seen(&self) -> Vec<String> {
        self.auth_seen.lock().unwrap().clone()
    }
}

impl ServiceClient for ScriptedClient {
    async fn fetch(&self, url: &str, auth: &str) -> Result<ServiceDescriptor, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.auth_seen.lock().unwrap().push(auth.to_string());
        let answer = self.answers.lock().unwrap().get(url).cloned();
        match answer {
            Some(Scripted::Vars(link_variables)) => Ok(ServiceDescriptor { link_variables }),
            Some(Scripted::Hang) => pending().await,
            Some(Scripted::Fail) | None => Err(FetchError::Status(500)),
        }
    }
}

/// [`Deployer`] that records every deployed config.
#[derive(Clone, Default)]
pub struct RecordingDeployer {
    deployed: Arc<Mutex<Vec<Vec<u8>>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<Mutex<Duration>>,
}

impl RecordingDeployer {
    /// Make every deploy take `delay` before it is recorded.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn deployed(&self) -> Vec<String> {
        self.deployed
            .lock()
            .unwrap()
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.deployed.lock().unwrap().len()
    }
}

impl Deployer for RecordingDeployer {
    async fn deploy(&self, config: &[u8]) -> Result<(), DeployError> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeployError::EmptyCommand);
        }
        self.deployed.lock().unwrap().push(config.to_vec());
        Ok(())
    }
}
