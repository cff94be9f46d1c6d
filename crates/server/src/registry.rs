//! The currently published skill table and its coalescing refresh.
//!
//! Readers clone an `Arc` to the published [`ResolvedTable`] and work on that
//! snapshot; a refresh builds a complete new table off to the side and swaps the
//! pointer, so a reader sees either the old table or the new one, never a mix.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use universal_skills_discovery::{DiscoveryError, ResolvedTable, SkillRecord, SkillResolver};

/// Result of a refresh pass, shared by every caller that joined it.
pub type RefreshOutcome = Result<Arc<ResolvedTable>, Arc<DiscoveryError>>;

type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Cloneable handle to the published skill table.
#[derive(Clone)]
pub struct SkillRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    resolver: Arc<SkillResolver>,
    current: RwLock<Arc<ResolvedTable>>,
    in_flight: Mutex<Option<InFlight>>,
    passes: AtomicU64,
}

impl SkillRegistry {
    /// Runs the startup resolution on the calling thread and publishes it.
    ///
    /// A broken location table is returned here so startup can fail loudly.
    pub fn bootstrap(resolver: SkillResolver) -> Result<Self, DiscoveryError> {
        let table = resolver.resolve()?;
        tracing::info!(
            target: "universal_skills::startup",
            skills = table.len(),
            locations = resolver.table().len(),
            duplicates = table.duplicates().len(),
            "initial skill resolution complete"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                resolver: Arc::new(resolver),
                current: RwLock::new(Arc::new(table)),
                in_flight: Mutex::new(None),
                passes: AtomicU64::new(0),
            }),
        })
    }

    /// The currently published table.
    pub fn snapshot(&self) -> Arc<ResolvedTable> {
        Arc::clone(&self.inner.current.read())
    }

    /// All skills, in location precedence order then by name.
    pub fn list_skills(&self) -> Vec<SkillRecord> {
        self.snapshot().skills().cloned().collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn get_skill(&self, name: &str) -> Option<SkillRecord> {
        self.snapshot().get(name).cloned()
    }

    /// Number of refresh passes started since bootstrap.
    pub fn passes_started(&self) -> u64 {
        self.inner.passes.load(Ordering::Relaxed)
    }

    /// Re-resolves every location and publishes the result.
    ///
    /// If a pass is already running, this waits for that pass and returns its
    /// table instead of starting another one. On failure the previously
    /// published table stays in place. Dropping the returned future does not
    /// cancel the pass.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let pass = {
            let mut slot = self.inner.in_flight.lock();
            match slot.as_ref() {
                Some(pass) => pass.clone(),
                None => {
                    let pass = self.start_pass();
                    *slot = Some(pass.clone());
                    pass
                }
            }
        };
        pass.await
    }

    /// Spawns the pass onto the runtime so it publishes and clears the slot even
    /// when every caller waiting on it has been dropped.
    fn start_pass(&self) -> InFlight {
        let pass_id = self.inner.passes.fetch_add(1, Ordering::Relaxed) + 1;
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let resolver = Arc::clone(&inner.resolver);
            let outcome = match tokio::task::spawn_blocking(move || resolver.resolve()).await {
                Ok(Ok(table)) => {
                    let table = Arc::new(table);
                    *inner.current.write() = Arc::clone(&table);
                    tracing::debug!(
                        target: "universal_skills::refresh",
                        pass = pass_id,
                        skills = table.len(),
                        "published refreshed skill table"
                    );
                    Ok(table)
                }
                Ok(Err(err)) => Err(Arc::new(err)),
                Err(join) => Err(Arc::new(DiscoveryError::Aborted(join.to_string()))),
            };
            inner.in_flight.lock().take();
            outcome
        });
        async move {
            task.await
                .unwrap_or_else(|join| Err(Arc::new(DiscoveryError::Aborted(join.to_string()))))
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillRegistry")
            .field("skills", &self.snapshot().len())
            .field("passes_started", &self.passes_started())
            .finish()
    }
}
