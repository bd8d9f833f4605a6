//! Positional argument helpers for plug bodies.
//!
//! The dispatcher hands arguments through without checking them. Plugs that
//! care about arity or shape call these so the failure comes from the plug.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PlugError, Result};

/// Fail unless at least `expected` arguments were passed.
pub fn expect_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() < expected {
        return Err(PlugError::Arity {
            expected,
            given: args.len(),
        });
    }
    Ok(())
}

/// Borrow the argument at `index`.
pub fn arg(args: &[Value], index: usize) -> Result<&Value> {
    args.get(index).ok_or_else(|| PlugError::Arity {
        expected: index.saturating_add(1),
        given: args.len(),
    })
}

/// Decode the argument at `index` into `D`.
pub fn arg_as<D: DeserializeOwned>(args: &[Value], index: usize) -> Result<D> {
    let value = arg(args, index)?;
    Ok(D::deserialize(value)?)
}
