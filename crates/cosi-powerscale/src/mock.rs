//! In-memory appliance for protocol tests.
//!
//! [`MockPowerscale`] keeps buckets, users, keys and directories in memory,
//! follows the same status contract as [`PowerscaleClient`] and records every
//! primitive call so tests can assert on the exact sequence issued.
//!
//! [`PowerscaleClient`]: crate::PowerscaleClient

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::StatusCode;

use crate::types::{AccessKey, AclEntry, Bucket, User};
use crate::{Error, PowerscaleApi, Result};

/// One primitive call received by [`MockPowerscale`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetBucket(String),
    CreateBucket(String),
    DeleteBucket(String),
    UpdateBucketAcl(String),
    DeleteDirectory(String),
    GetUser(String),
    CreateUser(String),
    DeleteUser(String),
    GetKey(String),
    CreateKey(String),
    DeleteKey(String),
}

impl MockCall {
    /// Returns whether this call would change remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::GetBucket(_) | Self::GetUser(_) | Self::GetKey(_)
        )
    }
}

#[derive(Debug, Default)]
struct MockState {
    buckets: BTreeMap<String, Bucket>,
    users: BTreeMap<String, User>,
    keys: BTreeMap<String, AccessKey>,
    directories: BTreeSet<String>,
    calls: Vec<MockCall>,
    failures: Vec<(MockCall, StatusCode)>,
    minted: u64,
}

/// In-memory [`PowerscaleApi`] implementation.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the other.
#[derive(Debug, Clone)]
pub struct MockPowerscale {
    state: Arc<Mutex<MockState>>,
    base_path: String,
    latency: Option<Duration>,
}

impl Default for MockPowerscale {
    fn default() -> Self {
        Self::new("/ifs/data/cosi")
    }
}

impl MockPowerscale {
    /// Creates an empty appliance placing bucket directories under `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            state: Arc::default(),
            base_path: base_path.into(),
            latency: None,
        }
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seeds an existing bucket and its directory.
    #[must_use]
    pub fn with_bucket(self, name: &str) -> Self {
        let bucket = Bucket::new(name, self.bucket_path(name));
        {
            let mut state = self.lock();
            state.directories.insert(bucket.path.clone());
            state.buckets.insert(name.to_owned(), bucket);
        }
        self
    }

    /// Seeds an existing bucket with the given ACL.
    #[must_use]
    pub fn with_bucket_acl(self, name: &str, acl: Vec<AclEntry>) -> Self {
        let this = self.with_bucket(name);
        if let Some(bucket) = this.lock().buckets.get_mut(name) {
            bucket.acl = acl;
        }
        this
    }

    /// Seeds an existing user.
    #[must_use]
    pub fn with_user(self, name: &str) -> Self {
        self.lock()
            .users
            .insert(name.to_owned(), User::enabled(name));
        self
    }

    /// Seeds an existing user holding `key`.
    #[must_use]
    pub fn with_key(self, name: &str, key: AccessKey) -> Self {
        let this = self.with_user(name);
        this.lock().keys.insert(name.to_owned(), key);
        this
    }

    /// Makes every subsequent `call` fail with `status`.
    pub fn fail_on(&self, call: MockCall, status: StatusCode) {
        self.lock().failures.push((call, status));
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Returns the calls that changed remote state, in order.
    pub fn mutations(&self) -> Vec<MockCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    /// Forgets the recorded calls, keeping the stored resources.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Returns a stored bucket.
    pub fn bucket(&self, name: &str) -> Option<Bucket> {
        self.lock().buckets.get(name).cloned()
    }

    /// Returns a stored user.
    pub fn user(&self, name: &str) -> Option<User> {
        self.lock().users.get(name).cloned()
    }

    /// Returns the stored key of a user.
    pub fn key(&self, name: &str) -> Option<AccessKey> {
        self.lock().keys.get(name).cloned()
    }

    /// Returns whether a directory exists.
    pub fn has_directory(&self, path: &str) -> bool {
        self.lock().directories.contains(path)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `call`, applies the configured latency and injected failures.
    async fn enter(&self, call: MockCall) -> Result<MutexGuard<'_, MockState>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        let failure = state
            .failures
            .iter()
            .find(|(failing, _)| *failing == call)
            .map(|(_, status)| *status);
        state.calls.push(call);

        match failure {
            Some(status) => Err(Error::unexpected_status(status, "injected failure")),
            None => Ok(state),
        }
    }
}

fn conflict(what: &str, name: &str) -> Error {
    let body = format!("{what} '{name}' already exists");
    Error::unexpected_status(StatusCode::CONFLICT, body)
}

#[async_trait::async_trait]
impl PowerscaleApi for MockPowerscale {
    fn bucket_path(&self, name: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), name)
    }

    async fn get_bucket(&self, name: &str) -> Result<Option<Bucket>> {
        let state = self.enter(MockCall::GetBucket(name.to_owned())).await?;
        Ok(state.buckets.get(name).cloned())
    }

    async fn create_bucket(&self, name: &str) -> Result<()> {
        let path = self.bucket_path(name);
        let mut state = self.enter(MockCall::CreateBucket(name.to_owned())).await?;
        if state.buckets.contains_key(name) {
            return Err(conflict("bucket", name));
        }
        state.directories.insert(path.clone());
        let bucket = Bucket::new(name, path);
        state.buckets.insert(name.to_owned(), bucket);
        Ok(())
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let mut state = self.enter(MockCall::DeleteBucket(name.to_owned())).await?;
        state.buckets.remove(name);
        Ok(())
    }

    async fn update_bucket_acl(&self, name: &str, acl: Vec<AclEntry>) -> Result<()> {
        let mut state = self
            .enter(MockCall::UpdateBucketAcl(name.to_owned()))
            .await?;
        match state.buckets.get_mut(name) {
            Some(bucket) => {
                bucket.acl = acl;
                Ok(())
            }
            None => Err(Error::BucketNotFound(name.to_owned())),
        }
    }

    async fn delete_directory(&self, path: &str) -> Result<()> {
        let mut state = self
            .enter(MockCall::DeleteDirectory(path.to_owned()))
            .await?;
        state.directories.remove(path);
        Ok(())
    }

    async fn get_user(&self, name: &str) -> Result<Option<User>> {
        let state = self.enter(MockCall::GetUser(name.to_owned())).await?;
        Ok(state.users.get(name).cloned())
    }

    async fn create_user(&self, name: &str) -> Result<()> {
        let mut state = self.enter(MockCall::CreateUser(name.to_owned())).await?;
        if state.users.contains_key(name) {
            return Err(conflict("user", name));
        }
        state.users.insert(name.to_owned(), User::enabled(name));
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        let mut state = self.enter(MockCall::DeleteUser(name.to_owned())).await?;
        state.users.remove(name);
        Ok(())
    }

    async fn get_key(&self, name: &str) -> Result<Option<AccessKey>> {
        let state = self.enter(MockCall::GetKey(name.to_owned())).await?;
        Ok(state.keys.get(name).cloned())
    }

    async fn create_key(&self, name: &str) -> Result<AccessKey> {
        let mut state = self.enter(MockCall::CreateKey(name.to_owned())).await?;
        if !state.users.contains_key(name) {
            return Err(Error::unexpected_status(
                StatusCode::NOT_FOUND,
                format!("user '{name}' not found"),
            ));
        }
        state.minted += 1;
        let key = AccessKey::new(
            format!("1_{name}_accid{}", state.minted),
            format!("secret{}", state.minted),
        );
        state.keys.insert(name.to_owned(), key.clone());
        Ok(key)
    }

    async fn delete_key(&self, name: &str) -> Result<()> {
        let mut state = self.enter(MockCall::DeleteKey(name.to_owned())).await?;
        state.keys.remove(name);
        Ok(())
    }
}
