//! Job deduplication
//!
//! At most one in-flight download per (source, format). The first caller
//! installs the job; concurrent callers clone a handle to the same shared
//! future, so every waiter observes the identical outcome. The entry is
//! dropped as soon as its future completes: a later request for the same
//! key starts fresh work, longer-term reuse is the cache's job.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::core::error::FetchResult;
use crate::download::MediaFormat;

type JobKey = (String, MediaFormat);
type JobHandle = Shared<BoxFuture<'static, FetchResult<PathBuf>>>;

/// Registry of in-flight download jobs keyed by (source, format).
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobKey, JobHandle>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Awaits the running job for this key, or installs one built by `start`.
    ///
    /// `start` is invoked at most once per installed job. The map entry is
    /// removed when its own future completes; removal is pointer-compared
    /// so a newer job under the same key is never evicted by a stale waiter.
    pub async fn get_or_start<F, Fut>(
        &self,
        source_id: &str,
        format: MediaFormat,
        start: F,
    ) -> FetchResult<PathBuf>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<PathBuf>> + Send + 'static,
    {
        let key = (source_id.to_string(), format);

        let handle = {
            let mut jobs = self.jobs.lock().await;
            match jobs.get(&key) {
                Some(existing) => {
                    log::debug!(
                        "⚠️ Duplicate job for {} [{}], attaching to the running one",
                        source_id,
                        format
                    );
                    existing.clone()
                }
                None => {
                    let handle: JobHandle = start().boxed().shared();
                    jobs.insert(key.clone(), handle.clone());
                    log::info!("📋 Job started: {} [{}] ({} in flight)", source_id, format, jobs.len());
                    handle
                }
            }
        };

        let result = handle.clone().await;

        {
            let mut jobs = self.jobs.lock().await;
            if let Some(current) = jobs.get(&key) {
                if current.ptr_eq(&handle) {
                    jobs.remove(&key);
                }
            }
        }

        result
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
