//! The link registry: code allocation, lookup, redirect accounting, deletion
//!
//! Every operation returns a typed [`RegistryError`]; nothing panics past this
//! boundary. Store calls are blocking and run on tokio's blocking pool, one
//! round trip per call, so no lock is ever held across an await.
//!
//! Uniqueness is enforced by the store (`insert_new` rejects taken codes
//! atomically). The generate-and-retry loop only picks candidates; a lost race
//! on a generated code simply costs one more attempt.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

use crate::code::{validate_code, CodeGenerator};
use crate::config::{ConfigError, Settings, DEFAULT_MAX_GENERATE_ATTEMPTS};
use crate::error::{RegistryError, StoreError};
use crate::model::{CreateRequest, Link};
use crate::store::LinkStore;

#[derive(Clone)]
pub struct LinkRegistry {
    store: Arc<dyn LinkStore>,
    generator: CodeGenerator,
    max_attempts: u32,
}

impl LinkRegistry {
    /// Registry with the default 6-character generator and retry bound
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self {
            store,
            generator: CodeGenerator::default(),
            max_attempts: DEFAULT_MAX_GENERATE_ATTEMPTS,
        }
    }

    pub fn from_settings(
        store: Arc<dyn LinkStore>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(store)
            .with_generator(CodeGenerator::new(settings.code_length)?)
            .with_max_attempts(settings.max_generate_attempts))
    }

    pub fn with_generator(mut self, generator: CodeGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Caps auto-generation attempts; values below 1 are raised to 1
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Creates a link with the requested code, or a generated one.
    ///
    /// The code format is checked before the URL, so a malformed code is
    /// reported as such whatever the target.
    pub async fn create(&self, request: CreateRequest) -> Result<Link, RegistryError> {
        let requested = request.requested_code().map(str::to_owned);
        if let Some(code) = &requested {
            validate_code(code)?;
        }
        parse_absolute_url(&request.target_url)
            .map_err(|_| RegistryError::InvalidUrl(request.target_url.clone()))?;

        let link = match requested {
            Some(code) => self.insert_with_code(code, request.target_url).await?,
            None => self.insert_generated(request.target_url).await?,
        };

        info!(code = %link.code, target = %link.target_url, "link created");
        Ok(link)
    }

    async fn insert_with_code(
        &self,
        code: String,
        target_url: String,
    ) -> Result<Link, RegistryError> {
        let link = Link::new(code, target_url, Utc::now());
        let candidate = link.clone();
        match self.blocking(move |store| store.insert_new(&candidate)).await {
            Ok(()) => Ok(link),
            Err(StoreError::Conflict) => Err(RegistryError::CodeConflict(link.code)),
            Err(err) => Err(err.into()),
        }
    }

    async fn insert_generated(&self, target_url: String) -> Result<Link, RegistryError> {
        for attempt in 1..=self.max_attempts {
            let link = Link::new(self.generator.generate(), target_url.clone(), Utc::now());
            let candidate = link.clone();
            match self.blocking(move |store| store.insert_new(&candidate)).await {
                Ok(()) => return Ok(link),
                Err(StoreError::Conflict) => {
                    debug!(code = %link.code, attempt, "generated code collided, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(attempts = self.max_attempts, "code generation exhausted its retry budget");
        Err(RegistryError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Read-only lookup; does not count as a click
    pub async fn get_by_code(&self, code: &str) -> Result<Link, RegistryError> {
        let key = code.to_owned();
        self.blocking(move |store| store.get(&key))
            .await?
            .ok_or_else(|| RegistryError::NotFound(code.to_owned()))
    }

    /// All links, newest first
    pub async fn list_all(&self) -> Result<Vec<Link>, RegistryError> {
        let mut links = self.blocking(|store| store.list()).await?;
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(links)
    }

    /// Resolves `code` for a redirect and counts the click.
    ///
    /// The click is counted before the stored target is re-validated, so a
    /// corrupt record still records the attempt.
    pub async fn redirect(&self, code: &str) -> Result<Url, RegistryError> {
        let key = code.to_owned();
        let link = self
            .blocking(move |store| store.record_click(&key))
            .await?
            .ok_or_else(|| RegistryError::NotFound(code.to_owned()))?;

        debug!(code = %link.code, clicks = link.click_count, "click recorded");

        parse_absolute_url(&link.target_url).map_err(|_| RegistryError::CorruptRecord {
            code: link.code.clone(),
            target_url: link.target_url.clone(),
        })
    }

    /// Removes `code`. Deleting a code that is already gone is `NotFound`.
    pub async fn delete(&self, code: &str) -> Result<(), RegistryError> {
        let key = code.to_owned();
        if self.blocking(move |store| store.remove(&key)).await? {
            info!(code, "link deleted");
            Ok(())
        } else {
            Err(RegistryError::NotFound(code.to_owned()))
        }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn LinkStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref())).await?
    }
}

/// Relative references fail with `RelativeUrlWithoutBase`
fn parse_absolute_url(raw: &str) -> Result<Url, url::ParseError> {
    Url::parse(raw)
}
