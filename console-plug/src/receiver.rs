use crate::error::{PlugError, Result};

/// Context a plug runs against.
///
/// Type-level dispatch binds no instance; instance-level dispatch binds the
/// value the plug was called on. `scope` is always the host type's name.
pub struct Receiver<'a, T> {
    instance: Option<&'a T>,
    scope: &'a str,
}

impl<'a, T> Receiver<'a, T> {
    pub(crate) fn for_type(scope: &'a str) -> Self {
        Self {
            instance: None,
            scope,
        }
    }

    pub(crate) fn for_instance(instance: &'a T, scope: &'a str) -> Self {
        Self {
            instance: Some(instance),
            scope,
        }
    }

    /// The bound instance, if the plug was called on one.
    pub fn instance(&self) -> Option<&'a T> {
        self.instance
    }

    /// The bound instance, or [`PlugError::MissingReceiver`] for type-level calls.
    pub fn this(&self) -> Result<&'a T> {
        self.instance.ok_or_else(|| PlugError::MissingReceiver {
            scope: self.scope.to_string(),
        })
    }

    /// Name of the declaring host type.
    pub fn scope(&self) -> &'a str {
        self.scope
    }

    pub fn is_static(&self) -> bool {
        self.instance.is_none()
    }
}

impl<T> Clone for Receiver<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Receiver<'_, T> {}

impl<T> std::fmt::Debug for Receiver<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("scope", &self.scope)
            .field("bound", &self.instance.is_some())
            .finish()
    }
}
