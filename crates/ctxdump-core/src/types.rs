//! Type model
//!
//! An explicit, loadable description of the object model's types. Each type
//! has a namespace-qualified name, a kind, optional generic arguments and an
//! ordered list of properties. Properties reference their value type by name;
//! names are resolved to [`TypeHandle`]s on demand so a model file can declare
//! types in any order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Built-in string type name
pub const STRING_TYPE: &str = "string";

/// Built-in scalar type names
pub const SCALAR_TYPES: &[&str] = &["int", "long", "bool", "decimal", "double", "datetime", "guid"];

/// Opaque identity of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(u32);

impl TypeHandle {
    /// Position of the type in its registry
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Record type with properties
    Object,

    /// Enumerable type; the element type is its single generic argument
    Collection,

    /// Text
    String,

    /// Number, boolean, date or any other leaf value
    Scalar,

    /// Unbound generic parameter (no concrete type)
    GenericParameter,
}

fn default_readable() -> bool {
    true
}

/// A declared property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: String,

    /// Name of the property's value type
    #[serde(rename = "type")]
    pub type_name: String,

    /// Whether the property has a public getter
    #[serde(default = "default_readable")]
    pub readable: bool,
}

/// A type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Namespace-qualified name (e.g. `Shop.Order`, `List<Shop.OrderLine>`)
    pub name: String,

    /// Type kind
    pub kind: TypeKind,

    /// Generic argument type names, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<String>,

    /// Properties in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            generic_args: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Declare a record type
    pub fn object(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Object)
    }

    /// Declare a collection of `element`
    pub fn collection(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Collection).with_generic_args(vec![element.into()])
    }

    /// Declare a scalar type
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Scalar)
    }

    /// Declare a string type
    pub fn string(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::String)
    }

    /// Declare an unbound generic parameter
    pub fn generic_parameter(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::GenericParameter)
    }

    /// Replace the generic arguments
    pub fn with_generic_args(mut self, args: Vec<String>) -> Self {
        self.generic_args = args;
        self
    }

    /// Append a readable property
    pub fn with_property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            type_name: type_name.into(),
            readable: true,
        });
        self
    }

    /// Append a property without a public getter
    pub fn with_write_only_property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            type_name: type_name.into(),
            readable: false,
        });
        self
    }
}

/// A property whose type name has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    /// Property name
    pub name: String,

    /// Handle of the value type
    pub property_type: TypeHandle,

    /// Whether the property has a public getter
    pub readable: bool,
}

/// On-disk shape of a type model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TypeModelFile {
    types: Vec<TypeDescriptor>,
}

/// Registry of type descriptors addressed by [`TypeHandle`]
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeHandle>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in string and scalar types
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(TypeDescriptor::string(STRING_TYPE));
        for name in SCALAR_TYPES {
            registry.register(TypeDescriptor::scalar(*name));
        }
        registry
    }

    /// Register a type, replacing any previous declaration with the same name
    pub fn register(&mut self, descriptor: TypeDescriptor) -> TypeHandle {
        if let Some(&handle) = self.by_name.get(&descriptor.name) {
            self.types[handle.index()] = descriptor;
            return handle;
        }

        let handle = TypeHandle(self.types.len() as u32);
        self.by_name.insert(descriptor.name.clone(), handle);
        self.types.push(descriptor);
        handle
    }

    /// Look up a type by name
    pub fn handle(&self, name: &str) -> Option<TypeHandle> {
        self.by_name.get(name).copied()
    }

    /// Get a type descriptor
    pub fn get(&self, handle: TypeHandle) -> Option<&TypeDescriptor> {
        self.types.get(handle.index())
    }

    /// Get a type's name
    pub fn name(&self, handle: TypeHandle) -> Option<&str> {
        self.get(handle).map(|t| t.name.as_str())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all types in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeHandle, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeHandle(i as u32), t))
    }

    fn descriptor(&self, handle: TypeHandle) -> Result<&TypeDescriptor, ModelError> {
        self.get(handle).ok_or(ModelError::UnknownHandle(handle))
    }

    fn resolve(&self, owner: &TypeDescriptor, type_name: &str) -> Result<TypeHandle, ModelError> {
        self.handle(type_name).ok_or_else(|| ModelError::UnresolvedType {
            owner: owner.name.clone(),
            type_name: type_name.to_string(),
        })
    }

    /// Resolve the properties of a type, in declaration order
    ///
    /// Fails if any property refers to an unregistered type.
    pub fn resolve_properties(&self, handle: TypeHandle) -> Result<Vec<ResolvedProperty>, ModelError> {
        let descriptor = self.descriptor(handle)?;

        descriptor
            .properties
            .iter()
            .map(|p| {
                Ok(ResolvedProperty {
                    name: p.name.clone(),
                    property_type: self.resolve(descriptor, &p.type_name)?,
                    readable: p.readable,
                })
            })
            .collect()
    }

    /// Resolve the generic arguments of a type
    pub fn generic_arguments(&self, handle: TypeHandle) -> Result<Vec<TypeHandle>, ModelError> {
        let descriptor = self.descriptor(handle)?;

        descriptor
            .generic_args
            .iter()
            .map(|name| self.resolve(descriptor, name))
            .collect()
    }

    /// Load a type model from JSON (`{"types": [...]}`), on top of the built-ins
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let file: TypeModelFile = serde_json::from_str(json)
            .map_err(|e| ModelError::ParseError(e.to_string()))?;

        let mut registry = Self::with_builtins();
        for descriptor in file.types {
            registry.register(descriptor);
        }
        Ok(registry)
    }

    /// Load a type model from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ModelError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Serialize every registered type to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        let file = TypeModelFile {
            types: self.types.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| ModelError::ParseError(e.to_string()))
    }
}

/// Type model errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown type handle {0}")]
    UnknownHandle(TypeHandle),

    #[error("Type '{owner}' refers to unknown type '{type_name}'")]
    UnresolvedType { owner: String, type_name: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry.register(
            TypeDescriptor::object("Shop.Order")
                .with_property("Id", "int")
                .with_property("Lines", "List<Shop.OrderLine>"),
        );
        registry.register(TypeDescriptor::collection("List<Shop.OrderLine>", "Shop.OrderLine"));
        registry.register(TypeDescriptor::object("Shop.OrderLine").with_property("Product", "string"));
        registry
    }

    #[test]
    fn builtins_are_registered() {
        let registry = TypeRegistry::with_builtins();
        let string = registry.handle(STRING_TYPE).unwrap();
        assert_eq!(registry.get(string).unwrap().kind, TypeKind::String);
        assert_eq!(registry.len(), 1 + SCALAR_TYPES.len());
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = TypeRegistry::new();
        let first = registry.register(TypeDescriptor::object("A"));
        let second = registry.register(TypeDescriptor::object("A").with_property("Id", "int"));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first).unwrap().properties.len(), 1);
    }

    #[test]
    fn properties_resolve_in_declaration_order() {
        let registry = shop_registry();
        let order = registry.handle("Shop.Order").unwrap();
        let props = registry.resolve_properties(order).unwrap();

        let names: Vec<_> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Lines"]);
        assert_eq!(registry.name(props[1].property_type), Some("List<Shop.OrderLine>"));
    }

    #[test]
    fn unresolved_property_type_is_an_error() {
        let mut registry = TypeRegistry::with_builtins();
        let broken = registry.register(TypeDescriptor::object("Shop.Broken").with_property("Ghost", "Shop.Ghost"));

        let err = registry.resolve_properties(broken).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnresolvedType {
                owner: "Shop.Broken".to_string(),
                type_name: "Shop.Ghost".to_string(),
            }
        );
    }

    #[test]
    fn model_json_roundtrip() {
        let json = r#"{
            "types": [
                {"name": "Shop.Customer", "kind": "object",
                 "properties": [{"name": "Orders", "type": "List<Shop.Order>"},
                                {"name": "Secret", "type": "string", "readable": false}]},
                {"name": "List<Shop.Order>", "kind": "collection", "generic_args": ["Shop.Order"]},
                {"name": "Shop.Order", "kind": "object"}
            ]
        }"#;

        let registry = TypeRegistry::from_json(json).unwrap();
        let customer = registry.handle("Shop.Customer").unwrap();
        let props = registry.resolve_properties(customer).unwrap();
        assert!(props[0].readable);
        assert!(!props[1].readable);

        let list = registry.handle("List<Shop.Order>").unwrap();
        assert_eq!(
            registry.generic_arguments(list).unwrap(),
            vec![registry.handle("Shop.Order").unwrap()]
        );

        let reparsed = TypeRegistry::from_json(&registry.to_json().unwrap()).unwrap();
        assert_eq!(reparsed.len(), registry.len());
    }
}
