use serde_json::Value;

use crate::error::Result;
use crate::receiver::Receiver;
use crate::registry::PlugRegistry;

impl<T> PlugRegistry<T> {
    /// Invoke `name` with no receiver bound.
    ///
    /// Whatever the plug returns, error or not, is handed back unchanged.
    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value> {
        // Resolve drops the lock before the call, so plugs may re-enter the registry.
        let plug = self.resolve(name)?;
        tracing::trace!(scope = %self.scope, plug = %name, args = args.len(), "dispatch static");
        plug(Receiver::for_type(&self.scope), args)
    }

    /// Invoke `name` with `instance` bound as the receiver.
    pub fn call(&self, instance: &T, name: &str, args: &[Value]) -> Result<Value> {
        let plug = self.resolve(name)?;
        tracing::trace!(scope = %self.scope, plug = %name, args = args.len(), "dispatch instance");
        plug(Receiver::for_instance(instance, &self.scope), args)
    }
}
