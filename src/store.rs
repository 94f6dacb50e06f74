//! The document store.
//!
//! Handlers only talk to the [`Store`] trait. [`MemStore`] keeps every
//! collection in memory as JSON documents and optionally persists each
//! document into `<data_dir>/<collection>/<id>.toml`.
//!
//! Writes of one document are serialized by a per-document lock held across
//! both the in-memory change and the file write, so the file always holds the
//! latest in-memory state once the write returns.

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::async_trait;
use dashmap::DashMap;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::Error;

/// Largest id handed out, so ids survive toml integers and JSON numbers.
pub const MAX_ID: u64 = (1 << 53) - 1;

/// Maximum number of values in a membership filter.
pub const MAX_IN_VALUES: usize = 30;

/// Generates a random document id.
#[inline]
pub fn new_id() -> u64 {
    rand::thread_rng().gen_range(1..=MAX_ID)
}

/// A document stored inside a collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection holding this kind of document.
    const COLLECTION: &'static str;

    fn id(&self) -> u64;
}

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn get<T: Document>(&self, id: u64) -> Result<Option<T>, Error>;

    /// Inserts the document, or replaces the existing one.
    async fn put<T: Document>(&self, doc: &T) -> Result<(), Error>;

    /// Inserts the document if its id is not taken.
    /// Returns whether the document was inserted.
    async fn insert<T: Document>(&self, doc: &T) -> Result<bool, Error>;

    /// Runs `f` against the stored document as a single atomic read-modify-write.
    ///
    /// Nothing is written if `f` fails. Returns `None` if there is no such document.
    async fn update<T, F, R>(&self, id: u64, f: F) -> Result<Option<R>, Error>
    where
        T: Document,
        F: FnOnce(&mut T) -> Result<R, Error> + Send,
        R: Send;

    /// Removes a document, returning whether it existed.
    async fn remove<T: Document>(&self, id: u64) -> Result<bool, Error>;

    async fn query<T: Document>(&self, query: Query<T>) -> Result<Vec<T>, Error>;
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A query against a single collection: filters, one ordering and a limit.
pub struct Query<T> {
    filters: Vec<Predicate<T>>,
    order: Option<Comparator<T>>,
    limit: Option<usize>,
}

impl<T: Document> Query<T> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(f));
        self
    }

    /// Matches documents whose field is one of `values`.
    ///
    /// # Errors
    ///
    /// - Errors if there are more than [`MAX_IN_VALUES`] values.
    pub fn field_in<V>(self, field: fn(&T) -> &V, values: Vec<V>) -> Result<Self, Error>
    where
        V: PartialEq + Send + Sync + 'static,
    {
        if values.len() > MAX_IN_VALUES {
            return Err(Error::Backend(format!(
                "membership filter on {} takes at most {MAX_IN_VALUES} values, got {}",
                T::COLLECTION,
                values.len()
            )));
        }
        Ok(self.filter(move |doc| values.contains(field(doc))))
    }

    pub fn order_by(mut self, cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.order = Some(Box::new(cmp));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies this query to a set of documents.
    pub fn run(&self, docs: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut docs: Vec<T> = docs
            .into_iter()
            .filter(|doc| self.filters.iter().all(|f| f(doc)))
            .collect();
        if let Some(ref cmp) = self.order {
            docs.sort_by(|a, b| cmp(a, b));
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

impl<T: Document> Default for Query<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

type Collection = Arc<DashMap<u64, serde_json::Value>>;

/// An in-memory document store.
#[derive(Default)]
pub struct MemStore {
    collections: DashMap<String, Collection>,
    /// Write locks by collection and document id.
    locks: DashMap<(&'static str, u64), Arc<Mutex<()>>>,
    dir: Option<PathBuf>,
}

impl MemStore {
    /// Creates an empty store without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a persisted store, loading every `<collection>/<id>.toml` under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let collections = DashMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let collection = Self::load_collection(&entry.path())?;
            tracing::info!("loaded {} documents from {name}", collection.len());
            collections.insert(name, Arc::new(collection));
        }

        Ok(Self {
            collections,
            locks: DashMap::new(),
            dir: Some(dir),
        })
    }

    fn load_collection(path: &Path) -> Result<DashMap<u64, serde_json::Value>, Error> {
        let docs = DashMap::new();
        for entry in std::fs::read_dir(path)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != "toml") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            else {
                tracing::warn!("skipping document with malformed name {}", path.display());
                continue;
            };
            let value: serde_json::Value = toml::from_str(&std::fs::read_to_string(&path)?)?;
            docs.insert(id, value);
        }
        Ok(docs)
    }

    fn collection(&self, name: &str) -> Collection {
        if let Some(c) = self.collections.get(name) {
            return c.clone();
        }
        self.collections
            .entry(name.to_owned())
            .or_default()
            .value()
            .clone()
    }

    /// Locks a document for writing. The guard must be held until the write
    /// has reached the disk.
    async fn lock_write<T: Document>(&self, id: u64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((T::COLLECTION, id))
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Writes a document into its file. Callers hold the write lock of the document.
    ///
    /// The content goes to `<id>.toml.tmp` first and is renamed over `<id>.toml`,
    /// so an interrupted write never leaves a truncated document behind.
    async fn persist<T: Document>(&self, doc: &T) -> Result<(), Error> {
        if let Some(ref dir) = self.dir {
            let path = dir.join(T::COLLECTION);
            tokio::fs::create_dir_all(&path).await?;
            let tmp = path.join(format!("{}.toml.tmp", doc.id()));
            tokio::fs::write(&tmp, toml::to_string(doc)?).await?;
            tokio::fs::rename(&tmp, path.join(format!("{}.toml", doc.id()))).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemStore {
    async fn get<T: Document>(&self, id: u64) -> Result<Option<T>, Error> {
        let collection = self.collection(T::COLLECTION);
        let doc = match collection.get(&id) {
            Some(value) => Some(T::deserialize(value.value())?),
            None => None,
        };
        Ok(doc)
    }

    async fn put<T: Document>(&self, doc: &T) -> Result<(), Error> {
        let value = serde_json::to_value(doc)?;
        let _guard = self.lock_write::<T>(doc.id()).await;
        self.persist(doc).await?;
        self.collection(T::COLLECTION).insert(doc.id(), value);
        Ok(())
    }

    async fn insert<T: Document>(&self, doc: &T) -> Result<bool, Error> {
        let value = serde_json::to_value(doc)?;
        let _guard = self.lock_write::<T>(doc.id()).await;
        let inserted = {
            let collection = self.collection(T::COLLECTION);
            let entry = collection.entry(doc.id());
            match entry {
                dashmap::mapref::entry::Entry::Occupied(_) => false,
                dashmap::mapref::entry::Entry::Vacant(v) => {
                    v.insert(value);
                    true
                }
            }
        };
        if inserted {
            self.persist(doc).await?;
        }
        Ok(inserted)
    }

    async fn update<T, F, R>(&self, id: u64, f: F) -> Result<Option<R>, Error>
    where
        T: Document,
        F: FnOnce(&mut T) -> Result<R, Error> + Send,
        R: Send,
    {
        let _guard = self.lock_write::<T>(id).await;
        let (result, doc) = {
            let collection = self.collection(T::COLLECTION);
            let Some(mut entry) = collection.get_mut(&id) else {
                return Ok(None);
            };
            let mut doc = T::deserialize(entry.value())?;
            let result = f(&mut doc)?;
            *entry.value_mut() = serde_json::to_value(&doc)?;
            (result, doc)
        };
        self.persist(&doc).await?;
        Ok(Some(result))
    }

    async fn remove<T: Document>(&self, id: u64) -> Result<bool, Error> {
        let _guard = self.lock_write::<T>(id).await;
        let removed = self.collection(T::COLLECTION).remove(&id).is_some();
        if let (true, Some(dir)) = (removed, &self.dir) {
            let path = dir.join(T::COLLECTION).join(format!("{id}.toml"));
            match tokio::fs::remove_file(path).await {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => return Err(err.into()),
                _ => (),
            }
        }
        Ok(removed)
    }

    async fn query<T: Document>(&self, query: Query<T>) -> Result<Vec<T>, Error> {
        let docs = self
            .collection(T::COLLECTION)
            .iter()
            .map(|e| T::deserialize(e.value()))
            .collect::<Result<Vec<T>, _>>()?;
        Ok(query.run(docs))
    }
}
