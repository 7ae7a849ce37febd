use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scanner_logging::{scanner_info, scanner_warn};

use crate::{AnalysisService, MutationOutcome, RecipientChange, RecipientList, ServiceError};

/// Client-side view of the server-held recipient list.
///
/// The cache is written only by a load. Mutations go to the service first
/// and are followed by a fresh load, so the cache never holds an entry the
/// server has not confirmed.
pub struct RecipientStore {
    service: Arc<dyn AnalysisService>,
    cache: Mutex<RecipientList>,
}

impl RecipientStore {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            cache: Mutex::new(RecipientList::default()),
        }
    }

    pub fn cached(&self) -> RecipientList {
        self.cache().clone()
    }

    /// Fetches the list and replaces the cache, reporting failures.
    pub async fn try_load(&self) -> Result<RecipientList, ServiceError> {
        let response = self.service.recipients().await?;
        let list = RecipientList::from_server(response.recipients);
        *self.cache() = list.clone();
        Ok(list)
    }

    /// Fetches the list and replaces the cache. On failure the error is
    /// logged and the current cache is returned unchanged.
    pub async fn load(&self) -> RecipientList {
        match self.try_load().await {
            Ok(list) => list,
            Err(err) => {
                scanner_warn!("Loading recipients failed: {}", err);
                self.cached()
            }
        }
    }

    pub async fn add(&self, email: &str) -> Result<MutationOutcome, ServiceError> {
        self.apply(RecipientChange::Add, email).await
    }

    pub async fn remove(&self, email: &str) -> Result<MutationOutcome, ServiceError> {
        self.apply(RecipientChange::Remove, email).await
    }

    pub async fn apply(
        &self,
        change: RecipientChange,
        email: &str,
    ) -> Result<MutationOutcome, ServiceError> {
        if email.trim().is_empty() {
            return Ok(MutationOutcome::Skipped);
        }
        match change {
            RecipientChange::Add => self.service.add_recipient(email).await?,
            RecipientChange::Remove => self.service.remove_recipient(email).await?,
        }
        scanner_info!("Recipient change {:?} accepted for {}", change, email);
        let recipients = self.load().await;
        Ok(MutationOutcome::Applied { recipients })
    }

    fn cache(&self) -> MutexGuard<'_, RecipientList> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
