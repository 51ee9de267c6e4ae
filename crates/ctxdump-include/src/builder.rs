//! Include-tree builder
//!
//! Expands a root type into a tree of navigation properties. Two behaviors
//! are easy to miss:
//!
//! - The depth cutoff ends the enumeration of the current type: when the
//!   path built so far already has `max_depth` dots, the first eligible
//!   property stops the whole loop, so none of the type's properties are
//!   added.
//! - With `add_to_ignore_list`, the *container* type being enumerated is
//!   marked in the cycle guard, not the property types it discovers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ctxdump_core::{Diagnostic, DiagnosticCode, IncludeConfig, Severity, TypeHandle};

use crate::guard::CycleGuard;
use crate::reflector::TypeReflector;
use crate::tree::{IncludeTree, NodeId};

/// Depth used when container marking is off and no finite depth was set
pub const UNMARKED_MAX_DEPTH: usize = 32;

/// Traversal options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Namespace prefix of traversable record types (case-insensitive)
    pub namespace_filter: String,

    /// Mark each enumerated container type in the cycle guard
    pub add_to_ignore_list: bool,

    /// Most `.` separators a produced path may contain
    ///
    /// A type reached through a path that already has this many separators
    /// is not expanded. `0` produces no paths at all.
    pub max_depth: usize,
}

impl BuildOptions {
    /// Options with the given namespace filter, cycle marking on and no depth limit
    pub fn new(namespace_filter: impl Into<String>) -> Self {
        Self {
            namespace_filter: namespace_filter.into(),
            add_to_ignore_list: true,
            max_depth: usize::MAX,
        }
    }

    /// Set the depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable marking of container types
    ///
    /// Without marking, only `max_depth` stops the traversal of a cyclic
    /// model, so pair `false` with a finite depth. [`IncludeTreeBuilder`]
    /// falls back to [`UNMARKED_MAX_DEPTH`] when none is set.
    pub fn with_ignore_list(mut self, add_to_ignore_list: bool) -> Self {
        self.add_to_ignore_list = add_to_ignore_list;
        self
    }

    /// Depth limit actually applied by the builder
    pub fn effective_max_depth(&self) -> usize {
        if !self.add_to_ignore_list && self.max_depth == usize::MAX {
            UNMARKED_MAX_DEPTH
        } else {
            self.max_depth
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&IncludeConfig> for BuildOptions {
    fn from(config: &IncludeConfig) -> Self {
        Self {
            namespace_filter: config.namespace.clone(),
            add_to_ignore_list: config.add_to_ignore_list,
            max_depth: config.max_depth,
        }
    }
}

/// Builds include trees with an injected [`TypeReflector`]
///
/// Reflection failures never abort a traversal: the failing type simply
/// contributes no children, and a `REFLECTION_FAILURE` diagnostic is kept.
pub struct IncludeTreeBuilder<'r, R: TypeReflector + ?Sized> {
    reflector: &'r R,
    options: BuildOptions,
    cancel: Option<Arc<AtomicBool>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r, R: TypeReflector + ?Sized> IncludeTreeBuilder<'r, R> {
    /// Create a builder
    pub fn new(reflector: &'r R, options: BuildOptions) -> Self {
        Self {
            reflector,
            options,
            cancel: None,
            diagnostics: Vec::new(),
        }
    }

    /// Stop expanding once `flag` is set
    ///
    /// The flag is checked on entry to every recursive call; calls made after
    /// it is set produce no nodes.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Traversal options
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Reflection failures recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the builder, returning its diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn type_name(&self, ty: TypeHandle) -> String {
        self.reflector
            .type_name(ty)
            .map(str::to_string)
            .unwrap_or_else(|| ty.to_string())
    }

    /// Expand the properties of `root_type` under `parent`
    ///
    /// Returns the newly created sibling nodes; their subtrees are attached to
    /// them in `tree`. The caller decides where the siblings go (as roots, or
    /// as another node's children).
    pub fn build(
        &mut self,
        tree: &mut IncludeTree,
        parent: Option<NodeId>,
        root_type: TypeHandle,
        guard: &mut CycleGuard,
    ) -> Vec<NodeId> {
        if self.is_cancelled() {
            return Vec::new();
        }

        let properties = match self.reflector.properties(root_type) {
            Ok(properties) => properties,
            Err(e) => {
                let type_name = self.type_name(root_type);
                tracing::warn!(type_name = %type_name, error = %e, "skipping expansion");
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticCode::ReflectionFailure, Severity::Warn, e.to_string())
                        .with_subject(type_name),
                );
                return Vec::new();
            }
        };

        let base_path = parent.map(|p| tree.path(p)).unwrap_or_default();
        let depth = base_path.matches('.').count();
        let mut created = Vec::new();

        for property in properties {
            let property_type = property.property_type;

            if !property.readable
                || !self.reflector.is_complex(property_type, &self.options.namespace_filter)
                || guard.contains(property_type)
            {
                continue;
            }

            if depth >= self.options.effective_max_depth() {
                tracing::debug!(path = %base_path, max_depth = self.options.effective_max_depth(), "depth limit reached");
                return created;
            }

            let node = tree.add_node(property.name, property_type, parent);
            created.push(node);

            if self.options.add_to_ignore_list {
                guard.mark(root_type);
            }

            let sub_type = self
                .reflector
                .element_type(property_type)
                .unwrap_or(property_type);

            let children = if guard.contains(sub_type) {
                Vec::new()
            } else {
                self.build(tree, Some(node), sub_type, guard)
            };
            tree.set_children(node, children);
        }

        created
    }

    /// Build a complete tree for one root type with a fresh guard
    pub fn build_tree(&mut self, root_type: TypeHandle) -> IncludeTree {
        let mut guard = CycleGuard::new();
        self.build_tree_with_guard(root_type, &mut guard)
    }

    /// Build a complete tree for one root type with a caller-supplied guard
    pub fn build_tree_with_guard(&mut self, root_type: TypeHandle, guard: &mut CycleGuard) -> IncludeTree {
        let mut tree = IncludeTree::new();
        let roots = self.build(&mut tree, None, root_type, guard);
        tree.extend_roots(roots);

        tracing::debug!(
            root = %self.type_name(root_type),
            nodes = tree.len(),
            "include tree built"
        );
        tree
    }

    /// Build one tree per root type
    ///
    /// With `share_guard`, types expanded for an earlier root are not expanded
    /// again for later ones.
    pub fn build_forest(&mut self, roots: &[TypeHandle], share_guard: bool) -> Vec<IncludeTree> {
        let mut shared = CycleGuard::new();

        roots
            .iter()
            .map(|&root| {
                if share_guard {
                    self.build_tree_with_guard(root, &mut shared)
                } else {
                    self.build_tree(root)
                }
            })
            .collect()
    }
}

/// Derive the include paths of `root_type`
pub fn include_paths<R: TypeReflector + ?Sized>(
    reflector: &R,
    root_type: TypeHandle,
    options: &BuildOptions,
) -> Vec<String> {
    IncludeTreeBuilder::new(reflector, options.clone())
        .build_tree(root_type)
        .paths()
}
