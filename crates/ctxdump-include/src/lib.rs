//! Include-path derivation
//!
//! This crate handles:
//! - Deciding which properties of a type are worth traversing (reflector)
//! - Tracking already expanded types during one traversal (cycle guard)
//! - Building a depth-bounded, cycle-safe include tree from a root type
//! - Flattening the tree into dotted paths for eager loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use ctxdump_include::{include_paths, BuildOptions, RegistryReflector};
//!
//! let reflector = RegistryReflector::new(&registry);
//! let root = registry.handle("Shop.Order").unwrap();
//! let paths = include_paths(&reflector, root, &BuildOptions::new("Shop.").with_max_depth(3));
//! // ["Customer", "Customer.Orders", "Lines"]
//! ```

pub mod reflector;
pub mod guard;
pub mod tree;
pub mod builder;
pub mod flatten;

pub use reflector::{TypeReflector, RegistryReflector, PropertyInfo, ReflectionError};
pub use guard::CycleGuard;
pub use tree::{IncludeTree, IncludeNode, NodeId};
pub use builder::{IncludeTreeBuilder, BuildOptions, include_paths, UNMARKED_MAX_DEPTH};
pub use flatten::flatten;
