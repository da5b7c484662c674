//! Process-wide registry of seed generators.
//!
//! Each model with seed data registers a zero-argument generator under its
//! logical name (the PascalCase form of its table name). Registration takes
//! the write lock; resolution takes the read lock and hands back a cloned
//! `Arc`, so generators run without holding the lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use heck::ToUpperCamelCase;

use crate::seed::{Model, SeedRow};

/// A registered seed generator.
pub type SeedFn = Arc<dyn Fn() -> Vec<SeedRow> + Send + Sync>;

static GLOBAL_REGISTRY: LazyLock<SeedRegistry> = LazyLock::new(SeedRegistry::new);

/// Derives a model's logical name from its table name.
///
/// # Examples
///
/// ```
/// use fleetify_schema::model_name_for_table;
///
/// assert_eq!(model_name_for_table("purchasing_details"), "PurchasingDetails");
/// assert_eq!(model_name_for_table("users"), "Users");
/// ```
#[must_use]
pub fn model_name_for_table(table: &str) -> String {
    table.to_upper_camel_case()
}

/// Mapping from logical model name to seed generator.
///
/// # Example
///
/// ```
/// use fleetify_schema::{SeedRegistry, SeedRow};
///
/// let registry = SeedRegistry::new();
/// registry.register("Roles", || {
///     vec![SeedRow::new().with("role_name", "ADMIN")]
/// });
///
/// let generator = registry.resolve("Roles").expect("registered");
/// assert_eq!(generator().len(), 1);
/// assert!(registry.resolve("Items").is_none());
/// ```
#[derive(Default)]
pub struct SeedRegistry {
    entries: RwLock<HashMap<String, SeedFn>>,
}

impl SeedRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Registers `generator` under `model_name`, replacing any previous entry.
    pub fn register<F>(&self, model_name: impl Into<String>, generator: F)
    where
        F: Fn() -> Vec<SeedRow> + Send + Sync + 'static,
    {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(model_name.into(), Arc::new(generator));
    }

    /// Registers a typed generator for model `M` under the logical name of
    /// `M::TABLE`.
    pub fn register_model<M>(&self, generator: fn() -> Vec<M>)
    where
        M: Model + 'static,
    {
        self.register(model_name_for_table(M::TABLE), move || {
            generator().iter().map(M::to_row).collect()
        });
    }

    /// Returns the generator registered under `model_name`.
    #[must_use]
    pub fn resolve(&self, model_name: &str) -> Option<SeedFn> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(model_name).cloned()
    }

    /// Returns the generator registered for `table`.
    #[must_use]
    pub fn resolve_table(&self, table: &str) -> Option<SeedFn> {
        self.resolve(&model_name_for_table(table))
    }

    /// Registered model names in sorted order.
    #[must_use]
    pub fn model_names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for SeedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedRegistry")
            .field("models", &self.model_names())
            .finish()
    }
}
