//! Shared fakes for the contact endpoint integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use contactflow_api::{ContactContext, build_router};
use contactflow_core::IntakeError;
use contactflow_core::models::{DeliveryReceipt, IntakeSettings, OAuthCredentials, OutgoingMail};
use contactflow_core::services::{
    AccessToken, InMemoryStore, MailTransport, MailTransportFactory, StoreConnector,
    TokenExchanger,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const OWNER_INBOX: &str = "inbox@example.com";
pub const SENDER: &str = "owner@example.com";

/// Environment with every required key set
pub fn complete_env() -> HashMap<String, String> {
    [
        ("MONGO_URI", "mongodb://localhost:27017/site"),
        ("CLIENT_ID", "client-id"),
        ("CLIENT_SECRET", "client-secret"),
        ("REFRESH_TOKEN", "refresh-token"),
        ("EMAIL_USER", SENDER),
        ("EMAIL_TO", OWNER_INBOX),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn settings_from(env: HashMap<String, String>) -> IntakeSettings {
    IntakeSettings::from_lookup(move |key: &str| env.get(key).cloned())
}

pub fn complete_settings() -> IntakeSettings {
    settings_from(complete_env())
}

/// Collects formatted log output while installed as the thread's subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Counts token exchanges; optionally refuses every one
#[derive(Default)]
pub struct CountingExchanger {
    exchanges: AtomicUsize,
    refuse: bool,
}

impl CountingExchanger {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchanger for CountingExchanger {
    async fn exchange(&self, _: &OAuthCredentials) -> Result<AccessToken, IntakeError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(IntakeError::Credential(
                "HTTP 400 Bad Request: invalid_grant".to_string(),
            ));
        }
        Ok(AccessToken::new("access-token", 3600))
    }
}

/// Records every message handed to the relay
#[derive(Default)]
pub struct RecordingTransports {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail_sends: bool,
}

impl RecordingTransports {
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransportFactory for RecordingTransports {
    fn build(
        &self,
        _user: &str,
        _token: &AccessToken,
    ) -> Result<Arc<dyn MailTransport>, IntakeError> {
        Ok(Arc::new(RecordingTransport {
            sent: Arc::clone(&self.sent),
            fail_sends: self.fail_sends,
        }))
    }
}

struct RecordingTransport {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail_sends: bool,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, IntakeError> {
        if self.fail_sends {
            return Err(IntakeError::Transport("connection reset by relay".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(DeliveryReceipt {
            to: mail.to.clone(),
            response: "250 2.0.0 OK".to_string(),
        })
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Router wired to in-process fakes
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub exchanger: Arc<CountingExchanger>,
    pub mail: Arc<RecordingTransports>,
}

impl TestApp {
    pub fn new(settings: IntakeSettings) -> Self {
        Self::with_parts(
            settings,
            InMemoryStore::new(),
            CountingExchanger::default(),
            RecordingTransports::default(),
        )
    }

    pub fn with_parts(
        settings: IntakeSettings,
        store: InMemoryStore,
        exchanger: CountingExchanger,
        mail: RecordingTransports,
    ) -> Self {
        let store = Arc::new(store);
        let exchanger = Arc::new(exchanger);
        let mail = Arc::new(mail);

        let ctx = ContactContext::new(
            settings,
            Arc::clone(&store) as Arc<dyn StoreConnector>,
            Arc::clone(&exchanger) as Arc<dyn TokenExchanger>,
            Arc::clone(&mail) as Arc<dyn MailTransportFactory>,
        );

        Self {
            router: build_router(ctx),
            store,
            exchanger,
            mail,
        }
    }

    pub async fn request(&self, method: Method, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&self, body: &str) -> TestResponse {
        self.request(Method::POST, "/contact", body).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Nothing was connected, exchanged or sent
    pub fn untouched(&self) -> bool {
        self.store.connect_count() == 0 && self.exchanger.count() == 0 && self.mail.sent().is_empty()
    }
}

pub const VALID_BODY: &str = r#"{"name":"Ana","email":"ana@x.com","message":"Hola"}"#;
