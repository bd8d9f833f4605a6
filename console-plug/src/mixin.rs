use serde::{Deserialize, Serialize};

use crate::error::{PlugError, Result};
use crate::registry::{Plug, PlugRegistry};

/// A value that offers a set of plugs for bulk import.
pub trait Mixin<T> {
    /// Name reported in [`PlugError::MalformedMixin`].
    fn mixin_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Offered operations, in import order.
    fn methods(&self) -> Vec<MixinMethod<'_, T>>;
}

/// What an offered operation declares it produces.
pub enum Output<'a, T> {
    /// Produces a plug. The factory runs only once the import accepts the entry.
    Plug(Box<dyn FnOnce() -> Plug<T> + 'a>),
    /// Produces something else; holds the declared result type, if any.
    Value(Option<String>),
}

/// One operation offered by a [`Mixin`].
pub struct MixinMethod<'a, T> {
    pub name: String,
    pub output: Output<'a, T>,
}

impl<'a, T> MixinMethod<'a, T> {
    pub fn plug(name: &str, factory: impl FnOnce() -> Plug<T> + 'a) -> Self {
        Self {
            name: name.into(),
            output: Output::Plug(Box::new(factory)),
        }
    }

    pub fn returning(name: &str, declared: &str) -> Self {
        Self {
            name: name.into(),
            output: Output::Value(Some(declared.into())),
        }
    }

    pub fn undeclared(name: &str) -> Self {
        Self {
            name: name.into(),
            output: Output::Value(None),
        }
    }

    pub fn produces_plug(&self) -> bool {
        matches!(self.output, Output::Plug(_))
    }
}

impl<T> std::fmt::Debug for MixinMethod<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match &self.output {
            Output::Plug(_) => "plug",
            Output::Value(Some(declared)) => declared.as_str(),
            Output::Value(None) => "undeclared",
        };
        f.debug_struct("MixinMethod")
            .field("name", &self.name)
            .field("output", &output)
            .finish()
    }
}

/// Import policy for [`PlugRegistry::mixin_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixinOptions {
    /// Overwrite plugs that are already registered under the same name.
    pub replace: bool,
    /// Validate every offered operation before registering any of them.
    ///
    /// When off, entries are registered one by one and a failure leaves the
    /// entries before it in place.
    pub atomic: bool,
}

impl Default for MixinOptions {
    fn default() -> Self {
        Self {
            replace: true,
            atomic: false,
        }
    }
}

impl<T> PlugRegistry<T> {
    /// Import every plug offered by `candidate`.
    ///
    /// With `replace` off, the first already-registered name fails the import
    /// with [`PlugError::Conflict`]. Entries imported before the failure stay.
    pub fn mixin<M: Mixin<T> + ?Sized>(&self, candidate: &M, replace: bool) -> Result<()> {
        self.mixin_with(
            candidate,
            MixinOptions {
                replace,
                ..MixinOptions::default()
            },
        )
    }

    pub fn mixin_with<M: Mixin<T> + ?Sized>(
        &self,
        candidate: &M,
        options: MixinOptions,
    ) -> Result<()> {
        let mixin = candidate.mixin_name();
        let methods = candidate.methods();
        let imported = if options.atomic {
            self.import_atomic(mixin, methods, options.replace)?
        } else {
            self.import_in_order(mixin, methods, options.replace)?
        };
        tracing::debug!(
            scope = %self.scope,
            mixin,
            imported,
            atomic = options.atomic,
            "imported mixin"
        );
        Ok(())
    }

    fn import_in_order(
        &self,
        mixin: &str,
        methods: Vec<MixinMethod<'_, T>>,
        replace: bool,
    ) -> Result<usize> {
        let mut imported = 0;
        for MixinMethod { name, output } in methods {
            if !replace && self.has(&name) {
                return Err(PlugError::Conflict { name });
            }
            let Output::Plug(factory) = output else {
                return Err(malformed(mixin, name));
            };
            let plug = factory();
            if replace {
                self.register(name, plug);
            } else {
                // The factory ran unlocked; another writer may have taken the name.
                self.register_new(name, plug)?;
            }
            imported += 1;
        }
        Ok(imported)
    }

    fn import_atomic(
        &self,
        mixin: &str,
        methods: Vec<MixinMethod<'_, T>>,
        replace: bool,
    ) -> Result<usize> {
        let mut staged: Vec<(String, Box<dyn FnOnce() -> Plug<T> + '_>)> =
            Vec::with_capacity(methods.len());
        {
            let plugs = self.read();
            for MixinMethod { name, output } in methods {
                if !replace
                    && (plugs.contains_key(&name) || staged.iter().any(|(n, _)| *n == name))
                {
                    return Err(PlugError::Conflict { name });
                }
                let Output::Plug(factory) = output else {
                    return Err(malformed(mixin, name));
                };
                staged.push((name, factory));
            }
        }

        // Factories run unlocked so they may consult the registry.
        let built: Vec<(String, Plug<T>)> = staged
            .into_iter()
            .map(|(name, factory)| (name, factory()))
            .collect();

        let mut plugs = self.write();
        if !replace {
            // A concurrent writer may have claimed a name since validation.
            if let Some((name, _)) = built.iter().find(|(name, _)| plugs.contains_key(name)) {
                return Err(PlugError::Conflict { name: name.clone() });
            }
        }
        let imported = built.len();
        for (name, plug) in built {
            self.insert_locked(&mut plugs, name, plug);
        }
        Ok(imported)
    }
}

fn malformed(mixin: &str, method: String) -> PlugError {
    PlugError::MalformedMixin {
        mixin: mixin.to_string(),
        method,
    }
}
