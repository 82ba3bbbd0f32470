use std::future::Future;

use benefits_common::{ModuleVersion, ModuleVersionId, ModuleVersionPatch};

use crate::domain::release::error::LifecycleError;
use crate::domain::release::lifecycle::Transition;

/// Ordered collection of module version entries.
///
/// Entries keep insertion order and are never removed.
pub trait ModuleRegistry: Clone + Send + Sync + 'static {
    /// All entries in insertion order
    fn list(&self) -> impl Future<Output = Vec<ModuleVersion>> + Send;

    fn get(&self, id: &ModuleVersionId) -> impl Future<Output = Option<ModuleVersion>> + Send;

    /// Add an entry at the end; module names need not be unique
    fn append(&self, entry: ModuleVersion) -> impl Future<Output = ()> + Send;

    /// Replace display fields of an entry.
    /// Unknown ids are a no-op and yield `None`; deactivated entries refuse the change.
    fn update(
        &self,
        id: &ModuleVersionId,
        patch: ModuleVersionPatch,
    ) -> impl Future<Output = Result<Option<ModuleVersion>, LifecycleError>> + Send;

    /// Run `change` against the entry and store its outcome as one atomic step:
    /// the entry is replaced by `updated` and `appended` goes to the end.
    /// Nothing is stored when `change` fails.
    fn transition<F>(
        &self,
        id: &ModuleVersionId,
        change: F,
    ) -> impl Future<Output = Result<Transition, LifecycleError>> + Send
    where
        F: FnOnce(&ModuleVersion) -> Result<Transition, LifecycleError> + Send;
}
