//! Test helpers: an in-memory reference service, a one-shot HTTP server and
//! record factories.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::models::{AddressLookup, CityOption, Record, StateOption};
use crate::reference::{normalize_postal_code, LookupError, LookupResult, ReferenceService};

// ===== MockReferenceService =====

pub struct MockReferenceService {
    states: Vec<StateOption>,
    cities: HashMap<u32, Vec<CityOption>>,
    addresses: HashMap<String, AddressLookup>,
    /// When set, every call fails as if the service answered 503
    unavailable: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockReferenceService {
    pub fn new() -> Self {
        let states = vec![
            StateOption { id: 35, abbreviation: "SP".into(), name: "São Paulo".into() },
            StateOption { id: 33, abbreviation: "RJ".into(), name: "Rio de Janeiro".into() },
        ];

        let mut cities = HashMap::new();
        cities.insert(
            35,
            vec![
                CityOption { id: 3550308, name: "São Paulo".into() },
                CityOption { id: 3509502, name: "Campinas".into() },
            ],
        );
        cities.insert(
            33,
            vec![
                CityOption { id: 3304557, name: "Rio de Janeiro".into() },
                CityOption { id: 3303302, name: "Niterói".into() },
            ],
        );

        let mut addresses = HashMap::new();
        addresses.insert(
            "01001000".to_string(),
            AddressLookup {
                street_address: "Praça da Sé".into(),
                state_code: "SP".into(),
                city: "São Paulo".into(),
                neighborhood: "Sé".into(),
            },
        );

        Self {
            states,
            cities,
            addresses,
            unavailable: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) -> LookupResult<()> {
        self.calls.lock().unwrap().push(call.clone());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Status { status_code: 503, url: call });
        }
        Ok(())
    }
}

#[async_trait]
impl ReferenceService for MockReferenceService {
    async fn list_states(&self) -> LookupResult<Vec<StateOption>> {
        self.record_call("states".to_string())?;
        Ok(self.states.clone())
    }

    async fn list_cities(&self, state_id: u32) -> LookupResult<Vec<CityOption>> {
        self.record_call(format!("cities:{}", state_id))?;
        self.cities
            .get(&state_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("municipalities for state {}", state_id)))
    }

    async fn lookup_postal_code(&self, postal_code: &str) -> LookupResult<AddressLookup> {
        self.record_call(format!("cep:{}", postal_code))?;
        let digits = normalize_postal_code(postal_code)?;
        self.addresses
            .get(&digits)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("postal code {}", digits)))
    }
}

// ===== One-shot HTTP server =====

/// Serve a single canned HTTP response on a loopback port and return its base URL
pub async fn serve_once(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while let Ok(n) = socket.read(&mut buf).await {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                503 => "Service Unavailable",
                _ => "Status",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

// ===== Factories =====

/// A record with every field filled
pub fn sample_record(name: &str) -> Record {
    Record {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "11 99999-0000".to_string(),
        postal_code: "01001-000".to_string(),
        street_address: "Praça da Sé".to_string(),
        state_code: "SP".to_string(),
        city: "São Paulo".to_string(),
        neighborhood: "Sé".to_string(),
        registration_date: "2024-03-01".to_string(),
    }
}
