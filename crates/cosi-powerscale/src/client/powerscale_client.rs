//! High-level client for the OneFS platform API.

use std::fmt;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::tls::build_http_client;
use crate::types::{
    AccessKey, AclEntry, AclUpdate, Bucket, BucketList, KeyEnvelope, User, UserList,
};
use crate::{Error, PowerscaleApi, PowerscaleConfig, Result, TRACING_TARGET_CLIENT};

/// Version prefix of the platform API.
const PLATFORM_PREFIX: [&str; 2] = ["platform", "14"];

const BUCKETS: [&str; 3] = ["protocols", "s3", "buckets"];
const KEYS: [&str; 3] = ["protocols", "s3", "keys"];
const USERS: [&str; 2] = ["auth", "users"];

/// Inner client that holds the HTTP client and configuration.
struct PowerscaleClientInner {
    http: Client,
    config: PowerscaleConfig,
}

/// Client for the PowerScale administrative API.
///
/// Cheap to clone; all clones share one connection pool. Implements
/// [`PowerscaleApi`].
///
/// # Examples
///
/// ```rust,ignore
/// use cosi_powerscale::{PowerscaleApi, PowerscaleClient, PowerscaleConfig};
///
/// let client = PowerscaleClient::new(config)?;
/// let bucket = client.get_bucket("reports").await?;
/// ```
#[derive(Clone)]
pub struct PowerscaleClient {
    inner: Arc<PowerscaleClientInner>,
}

impl fmt::Debug for PowerscaleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerscaleClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl PowerscaleClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the TLS material
    /// cannot be loaded.
    pub fn new(config: PowerscaleConfig) -> Result<Self> {
        config.validate().inspect_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                error = %err,
                "Configuration validation failed"
            );
        })?;

        let http = build_http_client(&config)?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.api_endpoint,
            zone = %config.zone,
            base_path = %config.base_path,
            timeout_ms = config.effective_timeout().as_millis(),
            "PowerScale client created"
        );

        let inner = PowerscaleClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &PowerscaleConfig {
        &self.inner.config
    }

    /// Appends `segments` to the API endpoint path.
    fn api_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let endpoint = &self.inner.config.api_endpoint;
        let mut url = endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("API endpoint '{endpoint}' cannot be a base")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Builds a zone-scoped URL under the platform API prefix.
    fn platform_url(&self, collection: &[&str], name: Option<&str>) -> Result<Url> {
        let segments = PLATFORM_PREFIX
            .into_iter()
            .chain(collection.iter().copied())
            .chain(name);
        let mut url = self.api_url(segments)?;
        url.query_pairs_mut()
            .clear()
            .append_pair("zone", &self.inner.config.zone);
        Ok(url)
    }

    /// Builds the namespace URL of a filesystem path.
    fn namespace_url(&self, path: &str) -> Result<Url> {
        let segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut url = self.api_url(std::iter::once("namespace").chain(segments))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("recursive", "true");
        Ok(url)
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.as_u16() > 299 {
            return Err(Error::unexpected_status(status, body));
        }

        Ok(body.to_vec())
    }

    /// GETs a resource; a 404 means the resource is absent.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.inner.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.bytes().await?;
        if status.as_u16() > 299 {
            return Err(Error::unexpected_status(status, body));
        }

        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Sends a JSON body with `method`.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<Vec<u8>> {
        self.execute(self.inner.http.request(method, url).json(body))
            .await
    }

    /// DELETEs a resource; returns `false` if it was already absent.
    async fn remove(&self, url: Url) -> Result<bool> {
        match self.execute(self.inner.http.delete(url)).await {
            Ok(_) => Ok(true),
            Err(Error::UnexpectedStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait::async_trait]
impl PowerscaleApi for PowerscaleClient {
    fn bucket_path(&self, name: &str) -> String {
        self.inner.config.bucket_path(name)
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn get_bucket(&self, name: &str) -> Result<Option<Bucket>> {
        let url = self.platform_url(&BUCKETS, Some(name))?;
        let list: Option<BucketList> = self.fetch(url).await?;
        Ok(list.and_then(BucketList::into_first))
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn create_bucket(&self, name: &str) -> Result<()> {
        let bucket = Bucket::new(name, self.bucket_path(name));
        let url = self.platform_url(&BUCKETS, None)?;
        self.send_json(reqwest::Method::POST, url, &bucket).await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            bucket = %name,
            path = %bucket.path,
            "Bucket created"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let url = self.platform_url(&BUCKETS, Some(name))?;
        let existed = self.remove(url).await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            bucket = %name,
            existed,
            "Bucket deleted"
        );
        Ok(())
    }

    #[tracing::instrument(
        skip(self, acl),
        target = "cosi_powerscale::client",
        fields(entries = acl.len())
    )]
    async fn update_bucket_acl(&self, name: &str, acl: Vec<AclEntry>) -> Result<()> {
        let url = self.platform_url(&BUCKETS, Some(name))?;
        let update = AclUpdate { acl };

        match self.send_json(reqwest::Method::PUT, url, &update).await {
            Ok(_) => Ok(()),
            Err(Error::UnexpectedStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(Error::BucketNotFound(name.to_owned()))
            }
            Err(err) => Err(err),
        }
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn delete_directory(&self, path: &str) -> Result<()> {
        let url = self.namespace_url(path)?;
        let existed = self.remove(url).await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            directory = %path,
            existed,
            "Directory deleted"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn get_user(&self, name: &str) -> Result<Option<User>> {
        let url = self.platform_url(&USERS, Some(name))?;
        let list: Option<UserList> = self.fetch(url).await?;
        Ok(list.and_then(UserList::into_first))
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn create_user(&self, name: &str) -> Result<()> {
        let url = self.platform_url(&USERS, None)?;
        self.send_json(reqwest::Method::POST, url, &User::enabled(name))
            .await?;

        tracing::info!(target: TRACING_TARGET_CLIENT, user = %name, "User created");
        Ok(())
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn delete_user(&self, name: &str) -> Result<()> {
        let url = self.platform_url(&USERS, Some(name))?;
        let existed = self.remove(url).await?;

        tracing::info!(target: TRACING_TARGET_CLIENT, user = %name, existed, "User deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn get_key(&self, name: &str) -> Result<Option<AccessKey>> {
        let url = self.platform_url(&KEYS, Some(name))?;
        let envelope: Option<KeyEnvelope> = self.fetch(url).await?;
        Ok(envelope
            .map(|envelope| envelope.keys)
            .filter(|key| !key.is_empty()))
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn create_key(&self, name: &str) -> Result<AccessKey> {
        let url = self.platform_url(&KEYS, Some(name))?;
        let body = self.execute(self.inner.http.post(url)).await?;
        let envelope: KeyEnvelope = serde_json::from_slice(&body)?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            user = %name,
            access_id = %envelope.keys.access_id,
            "Key created"
        );
        Ok(envelope.keys)
    }

    #[tracing::instrument(skip(self), target = "cosi_powerscale::client")]
    async fn delete_key(&self, name: &str) -> Result<()> {
        let url = self.platform_url(&KEYS, Some(name))?;
        let existed = self.remove(url).await?;

        tracing::info!(target: TRACING_TARGET_CLIENT, user = %name, existed, "Key deleted");
        Ok(())
    }
}
