//! Test double for the host environment: scripted windows, injectable
//! cross-origin messages, recorded cookies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use zabo_sdk::prelude::*;

pub struct MockWindow {
    closed: Arc<AtomicBool>,
}

impl ConnectorWindow for MockWindow {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn focus(&self) {}
}

pub struct MockHost {
    origin: String,
    healthy: AtomicBool,
    subscribers: Mutex<Vec<mpsc::Sender<HostMessage>>>,
    cookies: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
    windows: Mutex<Vec<Arc<AtomicBool>>>,
    opened_urls: Mutex<Vec<String>>,
    overlay_visible: AtomicBool,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: "https://app.example.com".into(),
            healthy: AtomicBool::new(true),
            subscribers: Mutex::new(Vec::new()),
            cookies: Mutex::new(HashMap::new()),
            windows: Mutex::new(Vec::new()),
            opened_urls: Mutex::new(Vec::new()),
            overlay_visible: AtomicBool::new(false),
        })
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Pre-seed a cookie before init (silent-resume scenarios).
    pub fn seed_cookie(&self, name: &str, value: &str) {
        self.cookies.lock().unwrap().insert(
            name.to_string(),
            (value.to_string(), Utc::now() + chrono::Duration::hours(1)),
        );
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies
            .lock()
            .unwrap()
            .get(name)
            .map(|(value, _)| value.clone())
    }

    /// Deliver a message to every live subscriber, as the browser would.
    pub async fn post_message(&self, origin: &str, data: &str) {
        let senders: Vec<_> = self.subscribers.lock().unwrap().clone();
        for tx in senders {
            let _ = tx
                .send(HostMessage {
                    origin: origin.to_string(),
                    data: data.to_string(),
                })
                .await;
        }
    }

    /// Simulate the user closing every open connector window.
    pub fn close_connector(&self) {
        for closed in self.windows.lock().unwrap().iter() {
            closed.store(true, Ordering::SeqCst);
        }
    }

    pub fn opened_count(&self) -> usize {
        self.opened_urls.lock().unwrap().len()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened_urls.lock().unwrap().clone()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible.load(Ordering::SeqCst)
    }

    /// Block until the connector window opens (listeners are live by then).
    pub async fn wait_for_window(&self) -> bool {
        for _ in 0..300 {
            if self.opened_count() > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

#[async_trait]
impl HostEnvironment for MockHost {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn open_window(&self, url: &str) -> Result<Box<dyn ConnectorWindow>, SdkError> {
        let closed = Arc::new(AtomicBool::new(false));
        self.windows.lock().unwrap().push(Arc::clone(&closed));
        self.opened_urls.lock().unwrap().push(url.to_string());
        Ok(Box::new(MockWindow { closed }))
    }

    fn show_overlay(&self, _name: &str) -> Result<(), SdkError> {
        self.overlay_visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide_overlay(&self, _name: &str) {
        self.overlay_visible.store(false, Ordering::SeqCst);
    }

    fn read_cookie(&self, name: &str) -> Option<String> {
        self.cookie(name)
    }

    fn write_cookie(&self, name: &str, value: &str, expires_at: DateTime<Utc>) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), (value.to_string(), expires_at));
    }

    async fn health_check(&self, _url: &str) -> Result<(), SdkError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SdkError::Connection(ConnectError::Refused))
        }
    }

    fn subscribe(&self) -> mpsc::Receiver<HostMessage> {
        let (tx, rx) = mpsc::channel(64);
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}
