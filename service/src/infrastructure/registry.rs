use std::sync::Arc;

use benefits_common::{ModuleVersion, ModuleVersionId, ModuleVersionPatch};
use tokio::sync::RwLock;

use crate::domain::registry::ModuleRegistry;
use crate::domain::release::error::LifecycleError;
use crate::domain::release::lifecycle::{Transition, check_patch};

/// Registry kept in process memory, seeded once at start.
/// A restart brings back the seed.
#[derive(Clone, Debug, Default)]
pub struct InMemoryModuleRegistry {
    entries: Arc<RwLock<Vec<ModuleVersion>>>,
}

impl InMemoryModuleRegistry {
    pub fn new(seed: Vec<ModuleVersion>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(seed)),
        }
    }
}

fn position(entries: &[ModuleVersion], id: &ModuleVersionId) -> Option<usize> {
    entries.iter().position(|entry| &entry.id == id)
}

impl ModuleRegistry for InMemoryModuleRegistry {
    async fn list(&self) -> Vec<ModuleVersion> {
        self.entries.read().await.clone()
    }

    async fn get(&self, id: &ModuleVersionId) -> Option<ModuleVersion> {
        let entries = self.entries.read().await;
        position(&entries, id).map(|index| entries[index].clone())
    }

    async fn append(&self, entry: ModuleVersion) {
        self.entries.write().await.push(entry);
    }

    async fn update(
        &self,
        id: &ModuleVersionId,
        patch: ModuleVersionPatch,
    ) -> Result<Option<ModuleVersion>, LifecycleError> {
        let mut entries = self.entries.write().await;
        let Some(index) = position(&entries, id) else {
            return Ok(None);
        };

        let entry = &mut entries[index];
        if !entry.is_active() {
            return Err(LifecycleError::Deactivated(id.to_string()));
        }
        check_patch(entry, &patch)?;
        entry.apply(patch);
        Ok(Some(entry.clone()))
    }

    async fn transition<F>(&self, id: &ModuleVersionId, change: F) -> Result<Transition, LifecycleError>
    where
        F: FnOnce(&ModuleVersion) -> Result<Transition, LifecycleError> + Send,
    {
        let mut entries = self.entries.write().await;
        let index = position(&entries, id).ok_or_else(|| LifecycleError::NotFound(id.to_string()))?;

        let transition = change(&entries[index])?;

        entries[index] = transition.updated.clone();
        if let Some(appended) = &transition.appended {
            entries.push(appended.clone());
        }
        Ok(transition)
    }
}
