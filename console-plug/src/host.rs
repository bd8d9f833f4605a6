//! Binding a registry to a concrete host type.
//!
//! `pluggable!(Type)` gives `Type` one process-wide [`PlugRegistry`], created
//! empty on first use, and the [`Pluggable`] call surface on top of it.

use serde_json::Value;

use crate::error::Result;
use crate::mixin::{Mixin, MixinOptions};
use crate::registry::{Plug, PlugRegistry};

/// A type that owns a plug registry.
pub trait Pluggable: Sized + 'static {
    fn plugs() -> &'static PlugRegistry<Self>;

    fn plug(name: impl Into<String>, plug: Plug<Self>) {
        Self::plugs().register(name, plug);
    }

    fn mixin<M: Mixin<Self> + ?Sized>(candidate: &M, replace: bool) -> Result<()> {
        Self::plugs().mixin(candidate, replace)
    }

    fn mixin_with<M: Mixin<Self> + ?Sized>(candidate: &M, options: MixinOptions) -> Result<()> {
        Self::plugs().mixin_with(candidate, options)
    }

    fn has_plug(name: &str) -> bool {
        Self::plugs().has(name)
    }

    fn unplug(name: &str) {
        Self::plugs().remove(name);
    }

    fn clear_plugs() {
        Self::plugs().clear();
    }

    /// Type-level dispatch.
    fn call_static(name: &str, args: &[Value]) -> Result<Value> {
        Self::plugs().call_static(name, args)
    }

    /// Instance-level dispatch with `self` as the receiver.
    fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        Self::plugs().call(self, name, args)
    }
}

/// Implement [`Pluggable`] for a concrete type.
///
/// The scope defaults to the type's full path; pass a second argument to
/// override it.
#[macro_export]
macro_rules! pluggable {
    ($ty:ty) => {
        $crate::pluggable!($ty, ::std::any::type_name::<$ty>());
    };
    ($ty:ty, $scope:expr) => {
        impl $crate::Pluggable for $ty {
            fn plugs() -> &'static $crate::PlugRegistry<Self> {
                static PLUGS: ::std::sync::OnceLock<$crate::PlugRegistry<$ty>> =
                    ::std::sync::OnceLock::new();
                PLUGS.get_or_init(|| $crate::PlugRegistry::new($scope))
            }
        }
    };
}
