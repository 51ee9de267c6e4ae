//! Type reflector
//!
//! The traversal never inspects types directly; it asks a [`TypeReflector`]
//! which properties a type has and whether a type is worth expanding. This
//! keeps the builder independent of how the type model is stored.

use ctxdump_core::{ModelError, TypeHandle, TypeKind, TypeRegistry};

/// A public property of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name
    pub name: String,

    /// Value type
    pub property_type: TypeHandle,

    /// Whether the property has a public getter
    pub readable: bool,
}

/// Errors raised while enumerating a type's properties
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectionError {
    #[error("Cannot enumerate properties of '{type_name}': {source}")]
    Enumerate {
        type_name: String,
        #[source]
        source: ModelError,
    },
}

/// Capability queries the include-tree builder needs from a type model
pub trait TypeReflector {
    /// Display name of a type (for logs and diagnostics)
    fn type_name(&self, ty: TypeHandle) -> Option<&str>;

    /// Public properties in declaration order
    fn properties(&self, ty: TypeHandle) -> Result<Vec<PropertyInfo>, ReflectionError>;

    /// Whether values of this type are worth traversing
    ///
    /// True if the type is not a string and is either an enumerable of
    /// non-scalar elements or its name starts with `namespace_filter`
    /// (case-insensitive).
    fn is_complex(&self, ty: TypeHandle, namespace_filter: &str) -> bool;

    /// Element type of an enumerable with exactly one generic argument
    fn element_type(&self, ty: TypeHandle) -> Option<TypeHandle>;
}

/// [`TypeReflector`] backed by a [`TypeRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct RegistryReflector<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> RegistryReflector<'r> {
    /// Create a reflector over a registry
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    fn kind(&self, ty: TypeHandle) -> Option<TypeKind> {
        self.registry.get(ty).map(|t| t.kind)
    }

    fn is_traversable(&self, ty: TypeHandle) -> bool {
        matches!(self.kind(ty), Some(TypeKind::Object | TypeKind::Collection))
    }
}

fn matches_namespace(name: &str, namespace_filter: &str) -> bool {
    name.to_lowercase().starts_with(&namespace_filter.to_lowercase())
}

impl TypeReflector for RegistryReflector<'_> {
    fn type_name(&self, ty: TypeHandle) -> Option<&str> {
        self.registry.name(ty)
    }

    fn properties(&self, ty: TypeHandle) -> Result<Vec<PropertyInfo>, ReflectionError> {
        let resolved = self.registry.resolve_properties(ty).map_err(|source| ReflectionError::Enumerate {
            type_name: self.type_name(ty).unwrap_or("<unknown>").to_string(),
            source,
        })?;

        Ok(resolved
            .into_iter()
            .map(|p| PropertyInfo {
                name: p.name,
                property_type: p.property_type,
                readable: p.readable,
            })
            .collect())
    }

    fn is_complex(&self, ty: TypeHandle, namespace_filter: &str) -> bool {
        let Some(descriptor) = self.registry.get(ty) else {
            return false;
        };

        match descriptor.kind {
            TypeKind::String | TypeKind::Scalar | TypeKind::GenericParameter => false,
            TypeKind::Collection => {
                let complex_elements = self
                    .element_type(ty)
                    .is_some_and(|element| self.is_traversable(element));
                complex_elements || matches_namespace(&descriptor.name, namespace_filter)
            }
            TypeKind::Object => matches_namespace(&descriptor.name, namespace_filter),
        }
    }

    fn element_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        if self.kind(ty)? != TypeKind::Collection {
            return None;
        }

        // Unresolvable or multi-argument generics are simply not eligible
        match self.registry.generic_arguments(ty).ok()?.as_slice() {
            [element] => Some(*element),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxdump_core::TypeDescriptor;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry.register(TypeDescriptor::object("Shop.Order").with_property("Id", "int"));
        registry.register(TypeDescriptor::object("Other.Audit"));
        registry.register(TypeDescriptor::collection("List<Shop.Order>", "Shop.Order"));
        registry.register(TypeDescriptor::collection("List<int>", "int"));
        registry.register(TypeDescriptor::collection("List<Other.Audit>", "Other.Audit"));
        registry.register(
            TypeDescriptor::collection("Dictionary<int,Shop.Order>", "int")
                .with_generic_args(vec!["int".into(), "Shop.Order".into()]),
        );
        registry.register(TypeDescriptor::collection("List<Ghost>", "Ghost"));
        registry.register(TypeDescriptor::generic_parameter("T"));
        registry
    }

    fn handle(registry: &TypeRegistry, name: &str) -> TypeHandle {
        registry.handle(name).unwrap()
    }

    #[test]
    fn namespace_prefix_is_case_insensitive() {
        let registry = registry();
        let reflector = RegistryReflector::new(&registry);
        let order = handle(&registry, "Shop.Order");

        assert!(reflector.is_complex(order, "shop."));
        assert!(reflector.is_complex(order, "SHOP"));
        assert!(!reflector.is_complex(order, "Other"));
    }

    #[test]
    fn strings_and_scalars_are_never_complex() {
        let registry = registry();
        let reflector = RegistryReflector::new(&registry);

        assert!(!reflector.is_complex(handle(&registry, "string"), ""));
        assert!(!reflector.is_complex(handle(&registry, "int"), ""));
        assert!(!reflector.is_complex(handle(&registry, "T"), ""));
    }

    #[test]
    fn collections_of_records_are_complex_outside_the_namespace() {
        let registry = registry();
        let reflector = RegistryReflector::new(&registry);

        assert!(reflector.is_complex(handle(&registry, "List<Other.Audit>"), "Shop."));
        assert!(!reflector.is_complex(handle(&registry, "List<int>"), "Shop."));
    }

    #[test]
    fn element_type_requires_exactly_one_argument() {
        let registry = registry();
        let reflector = RegistryReflector::new(&registry);

        assert_eq!(
            reflector.element_type(handle(&registry, "List<Shop.Order>")),
            Some(handle(&registry, "Shop.Order"))
        );
        assert_eq!(reflector.element_type(handle(&registry, "Dictionary<int,Shop.Order>")), None);
        assert_eq!(reflector.element_type(handle(&registry, "List<Ghost>")), None);
        assert_eq!(reflector.element_type(handle(&registry, "Shop.Order")), None);
    }

    #[test]
    fn unresolved_element_is_not_eligible() {
        let registry = registry();
        let reflector = RegistryReflector::new(&registry);

        assert!(!reflector.is_complex(handle(&registry, "List<Ghost>"), "Shop."));
    }

    #[test]
    fn property_enumeration_failure_names_the_type() {
        let mut registry = registry();
        let broken = registry.register(TypeDescriptor::object("Shop.Broken").with_property("X", "Nope"));
        let reflector = RegistryReflector::new(&registry);

        let err = reflector.properties(broken).unwrap_err();
        assert!(err.to_string().contains("Shop.Broken"));
    }
}
