use std::{
    collections::hash_map::DefaultHasher,
    fs,
    hash::{
        Hash,
        Hasher,
    },
    path::PathBuf,
    sync::Arc,
    time::SystemTime,
};

use moka::sync::Cache;

/// Bounded response cache shared by every catalog request.
///
/// Two layers: a byte-weighted in-memory cache in front of a budgeted disk
/// directory. Lookups promote disk entries back into memory; eviction on both
/// layers is the cache's own business, callers only get/put/clear.
pub struct ResponseCache {
    memory: Cache<String, Arc<Vec<u8>>>,
    disk: Option<DiskStore>,
}

impl ResponseCache {
    /// `disk_root: None` keeps the cache memory-only (e.g. when no platform
    /// cache directory exists, or in tests).
    pub fn new(memory_bytes: u64, disk_bytes: u64, disk_root: Option<PathBuf>) -> Self {
        let memory = Cache::builder()
            .max_capacity(memory_bytes)
            .weigher(|_key: &String, body: &Arc<Vec<u8>>| {
                body.len().try_into().unwrap_or(u32::MAX)
            })
            .build();

        let disk = disk_root.and_then(|root| DiskStore::open(root, disk_bytes));

        Self { memory, disk }
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        if let Some(body) = self.memory.get(key) {
            return Some(body);
        }

        let body = Arc::new(self.disk.as_ref()?.read(key)?);
        self.memory.insert(key.to_string(), body.clone());
        Some(body)
    }

    pub fn put(&self, key: String, body: Vec<u8>) {
        if let Some(disk) = &self.disk {
            disk.write(&key, &body);
        }
        self.memory.insert(key, Arc::new(body));
    }

    /// Drops every cached response from both layers.
    pub fn clear(&self) {
        self.memory.invalidate_all();
        if let Some(disk) = &self.disk {
            disk.clear();
        }
    }

    pub fn stats(&self) -> (u64, u64) {
        self.memory.run_pending_tasks();
        (self.memory.entry_count(), self.memory.weighted_size())
    }
}

/// Flat directory of response bodies, one file per cache key, capped at a
/// total byte budget. Oldest-recency files go first when over budget. I/O
/// failures are swallowed: a broken disk cache degrades to fetching.
struct DiskStore {
    root: PathBuf,
    budget_bytes: u64,
}

impl DiskStore {
    fn open(root: PathBuf, budget_bytes: u64) -> Option<Self> {
        fs::create_dir_all(&root).ok()?;
        Some(Self { root, budget_bytes })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.root.join(format!("{:016x}.json", hasher.finish()))
    }

    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        let body = fs::read(&path).ok()?;
        // Rewrite to refresh the file's recency; eviction below is oldest-first.
        let _ = fs::write(&path, &body);
        Some(body)
    }

    fn write(&self, key: &str, body: &[u8]) {
        if fs::write(self.entry_path(key), body).is_err() {
            return;
        }
        self.enforce_budget();
    }

    fn enforce_budget(&self) {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return;
        };

        let mut files: Vec<(PathBuf, u64, SystemTime)> = entries
            .flatten()
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                Some((entry.path(), meta.len(), meta.modified().ok()?))
            })
            .collect();

        let mut total: u64 = files.iter().map(|(_, len, _)| len).sum();
        if total <= self.budget_bytes {
            return;
        }

        files.sort_by_key(|(_, _, modified)| *modified);

        let mut evicted = 0usize;
        for (path, len, _) in files {
            if total <= self.budget_bytes {
                break;
            }
            if fs::remove_file(&path).is_ok() {
                total = total.saturating_sub(len);
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::debug!("evicted {evicted} cached responses to stay under the disk budget");
        }
    }

    fn clear(&self) {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return;
        };
        for entry in entries.flatten() {
            let _ = fs::remove_file(entry.path());
        }
    }
}
