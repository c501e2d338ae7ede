//! Alias-keyed converter registry.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::converter::{
    BooleanConverter, Converter, DateConverter, FileConverter, FloatConverter, IntegerConverter,
    StringConverter,
};

/// A shared converter instance.
pub type SharedConverter = Arc<dyn Converter>;

/// Maps type aliases to converters.
///
/// Lookups never fail: an unknown alias resolves to the string converter.
///
/// # Example
///
/// ```rust
/// use argus_convert::ConverterRegistry;
/// use argus_core::Value;
///
/// let registry = ConverterRegistry::with_builtins();
/// let int = registry.get("int");
/// assert_eq!(int.convert("page", "3".into()).unwrap(), Value::Int(3));
///
/// // Unknown aliases degrade to strings.
/// let unknown = registry.get("uuid");
/// assert_eq!(unknown.convert("id", Value::Int(7)).unwrap(), Value::from("7"));
/// ```
pub struct ConverterRegistry {
    converters: RwLock<HashMap<String, SharedConverter>>,
    fallback: SharedConverter,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("aliases", &self.aliases())
            .finish()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ConverterRegistry {
    /// Creates a registry with no aliases; every lookup yields the fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
            fallback: Arc::new(StringConverter),
        }
    }

    /// Creates a registry with the built-in converters installed.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.install(StringConverter);
        registry.install(IntegerConverter::default());
        registry.install(FloatConverter::default());
        registry.install(BooleanConverter);
        registry.install(FileConverter);
        registry.install(DateConverter::default());
        registry
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ConverterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Registers `converter` under every alias in `aliases`.
    ///
    /// Re-registering an alias replaces the previous converter.
    pub fn register<I, S>(&self, aliases: I, converter: SharedConverter)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut converters = self.converters.write();
        for alias in aliases {
            converters.insert(alias.into(), Arc::clone(&converter));
        }
    }

    /// Registers `converter` under its declared aliases, or under its type
    /// name when it declares none.
    pub fn install<C: Converter + 'static>(&self, converter: C) {
        let aliases = converter.aliases();
        let converter: SharedConverter = Arc::new(converter);
        if aliases.is_empty() {
            self.register([type_name::<C>()], converter);
        } else {
            self.register(aliases.iter().copied(), converter);
        }
    }

    /// Returns true if `alias` is registered.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.converters.read().contains_key(alias)
    }

    /// Returns the converter for `alias`, falling back to the string converter.
    #[must_use]
    pub fn get(&self, alias: &str) -> SharedConverter {
        if let Some(converter) = self.converters.read().get(alias) {
            return Arc::clone(converter);
        }
        debug!(alias, "unknown converter alias, using string converter");
        Arc::clone(&self.fallback)
    }

    /// Returns the registered aliases, sorted.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<_> = self.converters.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

fn type_name<C>() -> &'static str {
    let full = std::any::type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}
