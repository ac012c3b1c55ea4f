use std::collections::HashSet;
use std::sync::Mutex;
use vidvault_storage::{BlobBackend, BlobFailureKind, BlobOutcome, BlobStore};

/// Blob store that records deletes and fails the ids it was told to.
#[derive(Default)]
pub struct ScriptedBlobStore {
    failing: HashSet<String>,
    deleted: Mutex<Vec<String>>,
}

impl ScriptedBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delete of one of `ids` fails as a transient error.
    pub fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// External ids passed to `delete_object`, sorted.
    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.deleted.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

#[async_trait::async_trait]
impl BlobStore for ScriptedBlobStore {
    async fn delete_object(&self, external_id: &str) -> BlobOutcome {
        self.deleted.lock().unwrap().push(external_id.to_string());
        if self.failing.contains(external_id) {
            BlobOutcome::failed(BlobFailureKind::Transient, "HTTP 503: upstream unavailable")
        } else {
            BlobOutcome::Ok
        }
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Local
    }
}
