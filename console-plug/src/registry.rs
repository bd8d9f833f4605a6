use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{PlugError, Result};
use crate::receiver::Receiver;

/// A registered operation. The receiver is passed explicitly on every call.
pub type Plug<T> = Arc<dyn Fn(Receiver<'_, T>, &[Value]) -> Result<Value> + Send + Sync>;

/// Wrap a closure as a [`Plug`].
pub fn plug_fn<T, F>(f: F) -> Plug<T>
where
    F: Fn(Receiver<'_, T>, &[Value]) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Named plugs attached to one host type.
///
/// Lookups take a shared lock; register, remove, clear and mixin imports take
/// it exclusively. Entries keep registration order.
pub struct PlugRegistry<T> {
    pub(crate) scope: String,
    pub(crate) plugs: RwLock<IndexMap<String, Plug<T>>>,
}

impl<T> PlugRegistry<T> {
    /// Create an empty registry for the host type named `scope`.
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            plugs: RwLock::new(IndexMap::new()),
        }
    }

    /// Name of the host type this registry belongs to.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Store `plug` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, plug: Plug<T>) {
        let mut plugs = self.write();
        self.insert_locked(&mut plugs, name.into(), plug);
    }

    /// Store `plug` unless `name` is taken, checking and inserting under one lock.
    pub(crate) fn register_new(&self, name: String, plug: Plug<T>) -> Result<()> {
        let mut plugs = self.write();
        if plugs.contains_key(&name) {
            return Err(PlugError::Conflict { name });
        }
        self.insert_locked(&mut plugs, name, plug);
        Ok(())
    }

    pub(crate) fn insert_locked(&self, plugs: &mut IndexMap<String, Plug<T>>, name: String, plug: Plug<T>) {
        if plugs.insert(name.clone(), plug).is_some() {
            tracing::debug!(scope = %self.scope, plug = %name, "replaced plug");
        } else {
            tracing::trace!(scope = %self.scope, plug = %name, "registered plug");
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Remove `name`. Missing names are ignored.
    pub fn remove(&self, name: &str) {
        if self.write().shift_remove(name).is_some() {
            tracing::trace!(scope = %self.scope, plug = %name, "removed plug");
        }
    }

    pub fn clear(&self) {
        let mut plugs = self.write();
        let dropped = plugs.len();
        plugs.clear();
        tracing::debug!(scope = %self.scope, dropped, "cleared plugs");
    }

    /// Look up `name` without invoking it.
    pub fn resolve(&self, name: &str) -> Result<Plug<T>> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| PlugError::UnknownOperation {
                scope: self.scope.clone(),
                name: name.to_string(),
            })
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Plug<T>>> {
        // Writers never leave the map half-updated, so a poisoned lock is still usable.
        self.plugs.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Plug<T>>> {
        self.plugs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for PlugRegistry<T> {
    fn default() -> Self {
        Self::new(std::any::type_name::<T>())
    }
}

impl<T> std::fmt::Debug for PlugRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlugRegistry")
            .field("scope", &self.scope)
            .field("plugs", &self.names())
            .finish()
    }
}
