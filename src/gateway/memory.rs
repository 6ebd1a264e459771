//! In-memory gateway used by tests and the demo binary.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use super::{
    BlobInfo, BlobStore, Collection, GatewayError, RecordGateway, Select, Session,
    SessionAuthority, SortDir,
};

/// Backs every gateway trait with process-local state. A fail-writes switch
/// lets tests exercise the write-failure paths without a network.
pub struct MemoryGateway {
    tables: RwLock<HashMap<Collection, Vec<Value>>>,
    blobs: RwLock<HashMap<String, Vec<(String, Vec<u8>)>>>,
    accounts: RwLock<HashMap<String, String>>,
    session_tx: watch::Sender<Option<Session>>,
    // Held so the watch channel never closes; `send` would otherwise drop
    // the session when no subscriber exists.
    _session_rx: watch::Receiver<Option<Session>>,
    fail_writes: AtomicBool,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        let (session_tx, _session_rx) = watch::channel(None);
        Self {
            tables: RwLock::new(HashMap::new()),
            blobs: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
            session_tx,
            _session_rx,
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a credential accepted by `sign_in_with_password`.
    pub async fn add_account(&self, email: &str, password: &str) {
        self.accounts
            .write()
            .await
            .insert(email.to_string(), password.to_string());
    }

    /// Loads rows verbatim, ids included. For seeding fixtures.
    pub async fn seed(&self, collection: Collection, rows: Vec<Value>) {
        self.tables
            .write()
            .await
            .entry(collection)
            .or_default()
            .extend(rows);
    }

    /// All subsequent writes (records and blobs) fail until switched off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, AtomicOrdering::Relaxed);
    }

    fn write_guard(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(AtomicOrdering::Relaxed) {
            return Err(GatewayError::Unavailable("injected write failure".into()));
        }
        Ok(())
    }

    fn next_id(rows: &[Value]) -> u64 {
        rows.iter()
            .filter_map(|r| r.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1
    }
}

fn field<'a>(record: &'a Value, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&Value::Null)
}

fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl RecordGateway for MemoryGateway {
    async fn select(
        &self,
        collection: Collection,
        query: Select,
    ) -> Result<Vec<Value>, GatewayError> {
        let tables = self.tables.read().await;
        let rows = tables.get(&collection).cloned().unwrap_or_default();

        let mut hits: Vec<Value> = rows
            .into_iter()
            .filter(|r| {
                query.eq.iter().all(|(f, v)| field(r, f) == v)
                    && query.neq.iter().all(|(f, v)| field(r, f) != v)
                    && query
                        .within
                        .as_ref()
                        .map_or(true, |(f, vs)| vs.contains(field(r, f)))
            })
            .collect();

        if let Some((ref by, dir)) = query.order_by {
            hits.sort_by(|a, b| {
                let ord = cmp_values(field(a, by), field(b, by));
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }
        if let Some(n) = query.limit {
            hits.truncate(n);
        }
        Ok(hits)
    }

    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, GatewayError> {
        self.write_guard()?;
        if !record.is_object() {
            return Err(GatewayError::Rejected("record must be a JSON object".into()));
        }
        let mut tables = self.tables.write().await;
        let rows = tables.entry(collection).or_default();

        let mut record = record;
        if field(&record, "id").is_null() {
            record["id"] = Value::from(Self::next_id(rows));
        }
        if field(&record, "created_at").is_null() {
            record["created_at"] = Value::from(Utc::now().to_rfc3339());
        }
        tracing::debug!(collection = collection.as_str(), "insert");
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        collection: Collection,
        id: Value,
        patch: Value,
    ) -> Result<(), GatewayError> {
        self.write_guard()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(collection).or_default();
        let row = rows
            .iter_mut()
            .find(|r| field(r, "id") == &id)
            .ok_or(GatewayError::NotFound(collection.as_str()))?;

        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        tracing::debug!(collection = collection.as_str(), %id, "update");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Value) -> Result<(), GatewayError> {
        self.write_guard()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(collection).or_default();
        rows.retain(|r| field(r, "id") != &id);
        tracing::debug!(collection = collection.as_str(), %id, "delete");
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryGateway {
    async fn list(&self, bucket: &str) -> Result<Vec<BlobInfo>, GatewayError> {
        let blobs = self.blobs.read().await;
        Ok(blobs
            .get(bucket)
            .map(|files| {
                files
                    .iter()
                    .map(|(name, bytes)| BlobInfo {
                        name: name.clone(),
                        size: bytes.len() as u64,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upload(&self, bucket: &str, name: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        self.write_guard()?;
        let mut blobs = self.blobs.write().await;
        let files = blobs.entry(bucket.to_string()).or_default();
        if files.iter().any(|(n, _)| n == name) {
            return Err(GatewayError::Rejected(format!("{name} already exists")));
        }
        files.push((name.to_string(), bytes));
        Ok(())
    }

    async fn remove(&self, bucket: &str, name: &str) -> Result<(), GatewayError> {
        self.write_guard()?;
        let mut blobs = self.blobs.write().await;
        if let Some(files) = blobs.get_mut(bucket) {
            files.retain(|(n, _)| n != name);
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("memory://{bucket}/{name}")
    }
}

#[async_trait]
impl SessionAuthority for MemoryGateway {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, GatewayError> {
        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(stored) if stored == password => {
                let session = Session {
                    user_email: email.to_string(),
                    access_token: Uuid::new_v4().to_string(),
                };
                let _ = self.session_tx.send(Some(session.clone()));
                Ok(session)
            }
            _ => Err(GatewayError::Auth("Invalid login credentials".into())),
        }
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        let _ = self.session_tx.send(None);
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn select_filters_and_orders() {
        let gw = MemoryGateway::new();
        gw.seed(
            Collection::Products,
            vec![
                json!({"id": 1, "category": "AI Tools", "is_featured": true}),
                json!({"id": 2, "category": "Design Tools", "is_featured": false}),
                json!({"id": 3, "category": "AI Tools", "is_featured": false}),
            ],
        )
        .await;

        let hits = gw
            .select(
                Collection::Products,
                Select::all()
                    .eq("category", "AI Tools")
                    .order("id", SortDir::Desc),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["id"], 3);

        let hits = gw
            .select(Collection::Products, Select::all().neq("id", 2))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits = gw
            .select(
                Collection::Products,
                Select::all().within("id", vec![json!(1), json!(3)]).limit(1),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let gw = MemoryGateway::new();
        let stored = gw
            .insert(Collection::Reviews, json!({"comment": "great"}))
            .await
            .unwrap();
        assert_eq!(stored["id"], 1);
        assert!(stored["created_at"].is_string());
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() {
        let gw = MemoryGateway::new();
        gw.seed(Collection::Orders, vec![json!({"id": "FLM-1", "status": "Pending"})])
            .await;
        gw.update(
            Collection::Orders,
            json!("FLM-1"),
            json!({"status": "Completed"}),
        )
        .await
        .unwrap();
        let rows = gw.select(Collection::Orders, Select::all()).await.unwrap();
        assert_eq!(rows[0]["status"], "Completed");

        gw.delete(Collection::Orders, json!("FLM-1")).await.unwrap();
        assert!(gw
            .select(Collection::Orders, Select::all())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn injected_write_failures() {
        let gw = MemoryGateway::new();
        gw.set_fail_writes(true);
        assert!(gw.insert(Collection::Products, json!({})).await.is_err());
        gw.set_fail_writes(false);
        assert!(gw.insert(Collection::Products, json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let gw = MemoryGateway::new();
        gw.add_account("admin@example.com", "hunter2").await;
        let mut watcher = gw.subscribe_sessions();

        assert!(gw
            .sign_in_with_password("admin@example.com", "wrong")
            .await
            .is_err());
        let session = gw
            .sign_in_with_password("admin@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(gw.current_session().await, Some(session));
        watcher.changed().await.unwrap();
        assert!(watcher.borrow().is_some());

        gw.sign_out().await.unwrap();
        assert_eq!(gw.current_session().await, None);
    }

    #[tokio::test]
    async fn blob_store_round_trip() {
        let gw = MemoryGateway::new();
        gw.upload("product-images", "a.png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(gw
            .upload("product-images", "a.png", vec![4])
            .await
            .is_err());
        let files = gw.list("product-images").await.unwrap();
        assert_eq!(files, vec![BlobInfo { name: "a.png".into(), size: 3 }]);
        assert_eq!(
            gw.public_url("product-images", "a.png"),
            "memory://product-images/a.png"
        );
        gw.remove("product-images", "a.png").await.unwrap();
        assert!(gw.list("product-images").await.unwrap().is_empty());
    }
}
