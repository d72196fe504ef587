use super::decode::ProcessedResponse;
use super::part::{classify_kind, placeholder_response, BatchPart};
use crate::connection::BatchConnection;
use crate::types::{CursorOptions, HttpResponse, PartKey};
use crate::wire::{self, BATCH_URL};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identity of a batch, compared to decide which batch is active on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(Uuid);

impl BatchId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Construction options for a [`Batch`].
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Default for every part's [`CursorOptions::sanitize`].
    pub sanitize: bool,
    /// Put the connection into capture mode right away.
    pub start_capture: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            sanitize: false,
            start_capture: true,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_sanitize(mut self, s: bool) -> Self {
        self.sanitize = s;
        self
    }
    pub fn with_start_capture(mut self, s: bool) -> Self {
        self.start_capture = s;
        self
    }
}

/// Result of [`Batch::process`].
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// The server answered 200 and every part has its final response.
    Processed,
    /// The batch request itself failed; parts keep no final response.
    Failed(HttpResponse),
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Processed)
    }

    pub fn failure(&self) -> Option<&HttpResponse> {
        match self {
            ProcessOutcome::Failed(resp) => Some(resp),
            ProcessOutcome::Processed => None,
        }
    }
}

#[derive(Debug)]
struct BatchState {
    parts: IndexMap<PartKey, BatchPart>,
    next_part_id: Option<PartKey>,
    next_cursor_options: Option<CursorOptions>,
    default_cursor_options: CursorOptions,
    processed: bool,
}

impl BatchState {
    fn append(&mut self, method: &str, raw_request: &str) -> HttpResponse {
        let kind = classify_kind(method, raw_request);
        let placeholder = placeholder_response();
        let cursor_options = self
            .next_cursor_options
            .take()
            .unwrap_or(self.default_cursor_options);
        let id = self.next_part_id.take();
        // Positional keys count every part, named ones included.
        let key = id
            .clone()
            .unwrap_or(PartKey::Index(self.parts.len() as i64));
        let part = BatchPart::new(
            id,
            kind,
            raw_request.to_string(),
            placeholder.clone(),
            cursor_options,
        );
        if self.parts.insert(key.clone(), part).is_some() {
            debug!(key = %key, "batch part key reused; previous part replaced");
        }
        placeholder
    }
}

fn lock_state(state: &Mutex<BatchState>) -> MutexGuard<'_, BatchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Weak reference a connection keeps to its active batch, used to route
/// captured requests into it.
#[derive(Clone)]
pub struct BatchHandle {
    id: BatchId,
    state: Weak<Mutex<BatchState>>,
}

impl BatchHandle {
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Capture a request into the batch. Fails with [`Error::NotActive`] if
    /// the batch no longer exists.
    pub fn append(&self, method: &str, raw_request: &str) -> Result<HttpResponse> {
        let state = self.state.upgrade().ok_or(Error::NotActive)?;
        let mut state = lock_state(&state);
        Ok(state.append(method, raw_request))
    }
}

impl fmt::Debug for BatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchHandle")
            .field("id", &self.id)
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

/// A batch of sub-requests sent to the server as one multipart request.
///
/// While the batch captures, every request issued through its connection is
/// recorded as a [`BatchPart`] and answered with a placeholder. [`process`]
/// sends all parts at once and attaches each sub-response to its part.
///
/// [`process`]: Batch::process
pub struct Batch {
    id: BatchId,
    state: Arc<Mutex<BatchState>>,
    connection: Arc<dyn BatchConnection>,
}

impl Batch {
    pub fn new(connection: Arc<dyn BatchConnection>, options: BatchOptions) -> Self {
        let batch = Self {
            id: BatchId::new(),
            state: Arc::new(Mutex::new(BatchState {
                parts: IndexMap::new(),
                next_part_id: None,
                next_cursor_options: None,
                default_cursor_options: CursorOptions::new().with_sanitize(options.sanitize),
                processed: false,
            })),
            connection,
        };
        batch.connection.set_batch_request_mode(false);
        batch.connection.set_capture_batch(false);
        if options.start_capture {
            batch.activate();
            batch.connection.set_capture_batch(true);
            debug!(batch_id = %batch.id, "batch capture started");
        }
        batch
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn handle(&self) -> BatchHandle {
        BatchHandle {
            id: self.id,
            state: Arc::downgrade(&self.state),
        }
    }

    pub fn connection(&self) -> &Arc<dyn BatchConnection> {
        &self.connection
    }

    fn state(&self) -> MutexGuard<'_, BatchState> {
        lock_state(&self.state)
    }

    /// Make this the connection's active batch without touching the capture flag.
    pub fn activate(&self) -> &Self {
        self.connection.set_active_batch(Some(self.handle()));
        self
    }

    pub fn start_capture(&self) -> Result<&Self> {
        if self.is_processed() {
            return Err(Error::AlreadyProcessed);
        }
        self.activate();
        self.connection.set_capture_batch(true);
        debug!(batch_id = %self.id, "batch capture started");
        Ok(self)
    }

    pub fn stop_capture(&self) -> Result<&Self> {
        if !self.is_active() {
            return Err(Error::NotActive);
        }
        self.connection.set_capture_batch(false);
        debug!(batch_id = %self.id, "batch capture stopped");
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.connection
            .active_batch()
            .map(|h| h.id() == self.id)
            .unwrap_or(false)
    }

    /// The connection's capture flag; shared by every batch on that connection.
    pub fn is_capturing(&self) -> bool {
        self.connection.capture_batch()
    }

    pub fn is_processed(&self) -> bool {
        self.state().processed
    }

    /// Key to use for the next appended part instead of the positional one.
    pub fn next_part_id(&self, id: impl Into<PartKey>) -> &Self {
        self.state().next_part_id = Some(id.into());
        self
    }

    /// Cursor options for the next appended part instead of the batch default.
    pub fn next_part_cursor_options(&self, options: CursorOptions) -> &Self {
        self.state().next_cursor_options = Some(options);
        self
    }

    pub fn default_cursor_options(&self) -> CursorOptions {
        self.state().default_cursor_options
    }

    /// Record one raw request as a new part and return its placeholder response.
    pub fn append(&self, method: &str, raw_request: &str) -> HttpResponse {
        self.state().append(method, raw_request)
    }

    /// Send all parts as one request and attach the sub-responses.
    ///
    /// Capture is stopped first. A non-200 answer is returned as
    /// [`ProcessOutcome::Failed`] without touching the parts. A batch is
    /// sent at most once; later calls fail with [`Error::AlreadyProcessed`].
    pub async fn process(&self) -> Result<ProcessOutcome> {
        if self.is_processed() {
            return Err(Error::AlreadyProcessed);
        }
        self.stop_capture()?;

        let (body, part_count) = {
            let mut state = self.state();
            if state.parts.is_empty() {
                return Err(Error::EmptyBatch);
            }
            self.connection.set_batch_request_mode(true);
            state.processed = true;
            let body = wire::encode_batch_body(
                state
                    .parts
                    .values()
                    .map(|p| (p.id(), p.raw_request())),
            );
            (body, state.parts.len())
        };

        let start = Instant::now();
        let sent = self.connection.post(BATCH_URL, body).await;
        self.connection.set_batch_request_mode(false);
        let response = sent?;

        info!(
            batch_id = %self.id,
            parts = part_count,
            http_status = response.status(),
            duration_ms = start.elapsed().as_millis(),
            "batch request completed"
        );

        if response.status() != 200 {
            warn!(
                batch_id = %self.id,
                http_status = response.status(),
                "batch request failed; parts left without responses"
            );
            return Ok(ProcessOutcome::Failed(response));
        }

        let results = wire::demultiplex(response.body())?;
        let mut state = self.state();
        if let Some((key, _)) = results.iter().find(|(k, _)| !state.parts.contains_key(k)) {
            warn!(batch_id = %self.id, key = %key, "batch response fragment matches no part");
            return Err(Error::ProtocolCorrelation { key: key.clone() });
        }
        for (key, part_response) in results {
            if let Some(part) = state.parts.get_mut(&key) {
                part.set_response(part_response);
            }
        }
        Ok(ProcessOutcome::Processed)
    }

    pub fn count_parts(&self) -> usize {
        self.state().parts.len()
    }

    /// Snapshot of all parts in submission order.
    pub fn parts(&self) -> Vec<(PartKey, BatchPart)> {
        self.state()
            .parts
            .iter()
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect()
    }

    pub fn part(&self, key: impl Into<PartKey>) -> Result<BatchPart> {
        let key = key.into();
        self.state()
            .parts
            .get(&key)
            .cloned()
            .ok_or(Error::UnknownPart { key })
    }

    /// Final response of a part, or its placeholder before processing.
    pub fn part_response(&self, key: impl Into<PartKey>) -> Result<HttpResponse> {
        Ok(self.part(key)?.response().clone())
    }

    pub fn processed_part_response(&self, key: impl Into<PartKey>) -> Result<ProcessedResponse> {
        self.part(key)?.processed_response()
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        if self.is_active() {
            self.connection.set_capture_batch(false);
            self.connection.set_active_batch(None);
            debug!(batch_id = %self.id, "active batch dropped; capture cleared");
        }
    }
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Batch")
            .field("id", &self.id)
            .field("parts", &state.parts.len())
            .field("processed", &state.processed)
            .finish()
    }
}
