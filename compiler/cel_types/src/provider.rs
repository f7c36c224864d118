//! Schema capability.
//!
//! The checker never embeds field sets in [`Type`]: a struct type is just a
//! name, and fields are looked up through a [`TypeProvider`] when a select
//! or a message literal needs them.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Type;

/// Resolves message names and enum values.
///
/// Lookups must be deterministic and free of side effects. Providers are
/// shared between environments that check concurrently.
pub trait TypeProvider: Send + Sync {
    /// Descriptor of the message with this fully qualified name.
    fn find_type(&self, name: &str) -> Option<Arc<StructDescriptor>>;

    /// Value of `pkg.Enum.VALUE`.
    fn find_enum_value(&self, qualified: &str) -> Option<i64>;
}

/// Field layout of one message type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDescriptor {
    name: String,
    fields: BTreeMap<String, Type>,
    extensions: BTreeMap<String, Type>,
}

impl StructDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        StructDescriptor {
            name: name.into(),
            fields: BTreeMap::new(),
            extensions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    /// Add an extension field, selected by its fully qualified name.
    #[must_use]
    pub fn with_extension(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.extensions.insert(name.into(), ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The struct type this descriptor describes.
    pub fn ty(&self) -> Type {
        Type::Struct(self.name.clone())
    }

    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields.get(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn extension_field(&self, name: &str) -> Option<&Type> {
        self.extensions.get(name)
    }
}

/// In-memory [`TypeProvider`] built up front.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    types: FxHashMap<String, Arc<StructDescriptor>>,
    enum_values: FxHashMap<String, i64>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message type, replacing any previous one with that name.
    pub fn register(&mut self, descriptor: StructDescriptor) -> &mut Self {
        self.types
            .insert(descriptor.name().to_owned(), Arc::new(descriptor));
        self
    }

    /// Register the values of `enum_name` as `enum_name.VALUE`.
    pub fn register_enum(&mut self, enum_name: &str, values: &[(&str, i64)]) -> &mut Self {
        for (value_name, number) in values {
            self.enum_values
                .insert(format!("{enum_name}.{value_name}"), *number);
        }
        self
    }
}

impl TypeProvider for SchemaRegistry {
    fn find_type(&self, name: &str) -> Option<Arc<StructDescriptor>> {
        self.types.get(name).cloned()
    }

    fn find_enum_value(&self, qualified: &str) -> Option<i64> {
        self.enum_values.get(qualified).copied()
    }
}

/// Provider that knows no types.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyProvider;

impl TypeProvider for EmptyProvider {
    fn find_type(&self, _name: &str) -> Option<Arc<StructDescriptor>> {
        None
    }

    fn find_enum_value(&self, _qualified: &str) -> Option<i64> {
        None
    }
}
