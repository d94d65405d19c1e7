//! Capability adapters for the host environment.
//!
//! The resolver, state manager and switch orchestrator never touch browser
//! globals. They receive a [`Platform`] whose capabilities are optional: a
//! missing store or location means the code is running outside a browser
//! (server render, CLI) and the corresponding side effects are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

pub use crate::error::{NavigationError, StorageError};

/// Durable or session-scoped string storage (`localStorage`, `sessionStorage`).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The address bar.
pub trait Location: Send + Sync {
    /// Current path including any query string and fragment.
    fn path(&self) -> String;

    /// Replace the address bar entry without reloading (`history.pushState`).
    fn push_state(&self, path: &str) -> Result<(), NavigationError>;

    /// Full page navigation (`location.href = path`). Ends the page lifecycle.
    fn assign(&self, path: &str);
}

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Everything the host environment can offer.
#[derive(Clone)]
pub struct Platform {
    /// Durable store for the locale preference
    pub local_storage: Option<Arc<dyn KeyValueStore>>,

    /// Tab-scoped store for redirect suppression markers
    pub session_storage: Option<Arc<dyn KeyValueStore>>,

    /// Address bar access
    pub location: Option<Arc<dyn Location>>,

    /// Browser language preferences, most preferred first
    pub languages: Vec<String>,

    pub clock: Arc<dyn Clock>,
}

impl Platform {
    /// A context with no browser capabilities at all.
    pub fn headless() -> Self {
        Self {
            local_storage: None,
            session_storage: None,
            location: None,
            languages: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_local_storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.local_storage = Some(store);
        self
    }

    pub fn with_session_storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session_storage = Some(store);
        self
    }

    pub fn with_location(mut self, location: Arc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The current path, or `/` when there is no address bar.
    pub fn current_path(&self) -> String {
        self.location
            .as_ref()
            .map(|location| location.path())
            .unwrap_or_else(|| "/".to_string())
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::headless()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==================== Stores ====================

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        lock(&self.entries).clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk, for headless use.
///
/// The file is read on every access so several processes see each other's
/// writes. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Io(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = lock(&self.guard);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

// ==================== Location ====================

#[derive(Debug)]
struct LocationState {
    path: String,
    history: Vec<String>,
    assigned: Option<String>,
}

/// In-process address bar that records every update.
#[derive(Debug)]
pub struct MemoryLocation {
    state: Mutex<LocationState>,
    refusal: Option<NavigationError>,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self::build(path.into(), None)
    }

    /// An address bar with no History API.
    pub fn without_history(path: impl Into<String>) -> Self {
        Self::build(path.into(), Some(NavigationError::HistoryUnavailable))
    }

    /// An address bar whose History API refuses every update with `reason`.
    pub fn rejecting(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::build(path.into(), Some(NavigationError::Rejected(reason.into())))
    }

    fn build(path: String, refusal: Option<NavigationError>) -> Self {
        Self {
            state: Mutex::new(LocationState {
                path,
                history: Vec::new(),
                assigned: None,
            }),
            refusal,
        }
    }

    /// Paths pushed through the History API, oldest first.
    pub fn history(&self) -> Vec<String> {
        lock(&self.state).history.clone()
    }

    /// Target of the last full navigation, if any.
    pub fn assigned(&self) -> Option<String> {
        lock(&self.state).assigned.clone()
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> String {
        lock(&self.state).path.clone()
    }

    fn push_state(&self, path: &str) -> Result<(), NavigationError> {
        if let Some(refusal) = &self.refusal {
            return Err(refusal.clone());
        }
        let mut state = lock(&self.state);
        state.path = path.to_string();
        state.history.push(path.to_string());
        Ok(())
    }

    fn assign(&self, path: &str) {
        let mut state = lock(&self.state);
        state.path = path.to_string();
        state.assigned = Some(path.to_string());
    }
}

// ==================== Clocks ====================

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
