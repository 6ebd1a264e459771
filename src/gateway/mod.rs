//! Remote data gateway contract
//!
//! The hosted backend is a generic key-table CRUD service plus a file-blob
//! store and a session authority. Everything in this crate talks to it
//! through these traits; [`MemoryGateway`] implements all three for tests
//! and the demo binary.

mod memory;

pub use memory::MemoryGateway;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

/// Named record collections the storefront persists into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Categories,
    PaymentMethods,
    Orders,
    Reviews,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::PaymentMethods => "payment_methods",
            Self::Orders => "orders",
            Self::Reviews => "reviews",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Equality/ordering/limit filters — the only query surface the backend
/// offers.
#[derive(Clone, Debug, Default)]
pub struct Select {
    pub eq: Vec<(String, Value)>,
    pub neq: Vec<(String, Value)>,
    pub within: Option<(String, Vec<Value>)>,
    pub order_by: Option<(String, SortDir)>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.eq.push((field.to_string(), value.into()));
        self
    }

    pub fn neq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.neq.push((field.to_string(), value.into()));
        self
    }

    pub fn within(mut self, field: &str, values: Vec<Value>) -> Self {
        self.within = Some((field.to_string(), values));
        self
    }

    pub fn order(mut self, field: &str, dir: SortDir) -> Self {
        self.order_by = Some((field.to_string(), dir));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("record not found in {0}")]
    NotFound(&'static str),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// CRUD over named collections. Rows travel as JSON values; the sanitization
/// layer owns turning them into domain types.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn select(&self, collection: Collection, query: Select)
        -> Result<Vec<Value>, GatewayError>;

    /// Returns the stored record (with backend-assigned id/created_at).
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, GatewayError>;

    async fn update(
        &self,
        collection: Collection,
        id: Value,
        patch: Value,
    ) -> Result<(), GatewayError>;

    async fn delete(&self, collection: Collection, id: Value) -> Result<(), GatewayError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobInfo {
    pub name: String,
    pub size: u64,
}

/// File-blob storage for product imagery.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn list(&self, bucket: &str) -> Result<Vec<BlobInfo>, GatewayError>;
    async fn upload(&self, bucket: &str, name: &str, bytes: Vec<u8>) -> Result<(), GatewayError>;
    async fn remove(&self, bucket: &str, name: &str) -> Result<(), GatewayError>;
    fn public_url(&self, bucket: &str, name: &str) -> String;
}

/// An authenticated backend session. Opaque to this layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_email: String,
    pub access_token: String,
}

/// Credential/session authority.
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, GatewayError>;

    async fn sign_out(&self) -> Result<(), GatewayError>;

    async fn current_session(&self) -> Option<Session>;

    /// Watch for sign-in/sign-out transitions.
    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>>;
}
