//! Shared fixtures: a scripted licensing API and a manager wired to in-memory collaborators

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stackboost_core::license::client::{Endpoint, Transport};
use stackboost_core::{LicenseError, LicenseManager, ManualClock, MemoryStore};

pub const HOUR: Duration = Duration::from_secs(60 * 60);
pub const START: u64 = 1_700_000_000;

pub const PRO_VARIANT: i64 = 1147440;
pub const BUSINESS_VARIANT: i64 = 1147459;

/// A recorded request: endpoint plus its form fields
pub type Call = (Endpoint, Vec<(String, String)>);

/// Transport that replies from a script and records every call.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<HashMap<Endpoint, Result<String, LicenseError>>>,
    calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, endpoint: Endpoint, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(endpoint, Ok(body.to_string()));
    }

    pub fn fail(&self, endpoint: Endpoint, err: LicenseError) {
        self.replies.lock().unwrap().insert(endpoint, Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .count()
    }
}

impl Transport for StubTransport {
    fn post(&self, endpoint: Endpoint, form: &[(&str, &str)]) -> Result<String, LicenseError> {
        self.calls.lock().unwrap().push((
            endpoint,
            form.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self.replies
            .lock()
            .unwrap()
            .get(&endpoint)
            .cloned()
            .unwrap_or_else(|| Err(LicenseError::NetworkError("no scripted reply".into())))
    }
}

pub struct Harness {
    pub manager: LicenseManager,
    pub store: Arc<MemoryStore>,
    pub transport: Arc<StubTransport>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let transport = StubTransport::new();
    let manager = LicenseManager::new(store.clone(), transport.clone()).with_clock(clock.clone());
    Harness {
        manager,
        store,
        transport,
        clock,
    }
}

pub fn activated_body(variant_id: i64, instance_id: &str) -> String {
    format!(
        r#"{{"activated": true, "error": null, "license_key": {{"status": "active"}}, "instance": {{"id": "{instance_id}", "name": "site.test"}}, "meta": {{"store_id": 253042, "variant_id": {variant_id}}}}}"#
    )
}

pub fn valid_body(variant_id: i64) -> String {
    format!(r#"{{"valid": true, "error": null, "meta": {{"variant_id": {variant_id}}}}}"#)
}
