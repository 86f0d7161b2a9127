//! ObjectTree: the class hierarchy and the program-wide registries.
//!
//! [`ObjectTree`] is the single entry point for declaring classes, vars,
//! globals and procs. Classes live in a petgraph arena addressed by
//! [`ClassId`]; each node keeps its parent as an optional id, and the graph
//! carries one `Inherits` edge from every parent to each child for
//! traversal. The root is always `ClassId(0)` and a class's parent is fixed
//! when it is created, so the hierarchy cannot form a cycle.
//!
//! Declaring things on a class also allocates ids in the shared
//! [`ProcTable`] and [`GlobalTable`]. All mutations go through this type so
//! those stay in sync.
//!
//! Resolution queries live in [`resolve`](crate::resolve), initializer
//! synthesis in [`init`](crate::init).

use std::collections::HashMap;

use indexmap::IndexSet;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::class::ClassNode;
use crate::error::CoreError;
use crate::expr::{Expr, InitExpr, Location};
use crate::global::GlobalTable;
use crate::id::{ClassId, GlobalId, ProcId};
use crate::path::TypePath;
use crate::proc::{ProcAttributes, ProcTable};
use crate::value_type::ComplexValueType;
use crate::variable::Variable;

/// Edge from a parent class to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inherits;

/// The class hierarchy plus the proc and global registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTree {
    classes: Graph<ClassNode, Inherits, Directed, u32>,
    paths: HashMap<TypePath, ClassId>,
    pub procs: ProcTable,
    pub globals: GlobalTable,
}

impl ObjectTree {
    /// Creates a tree holding only the root class `/`.
    pub fn new() -> Self {
        let mut classes = Graph::default();
        let root = classes.add_node(ClassNode::new(ClassId::ROOT, TypePath::root(), None));
        debug_assert_eq!(ClassId::from(root), ClassId::ROOT);

        let mut paths = HashMap::new();
        paths.insert(TypePath::root(), ClassId::ROOT);

        ObjectTree {
            classes,
            paths,
            procs: ProcTable::new(),
            globals: GlobalTable::new(),
        }
    }

    /// Creates a tree with the language's built-in classes:
    ///
    /// ```text
    /// /
    /// ├── /datum
    /// │   └── /atom
    /// │       ├── /area
    /// │       ├── /turf
    /// │       └── /atom/movable
    /// │           ├── /obj
    /// │           └── /mob
    /// └── /list
    /// ```
    pub fn with_builtin_types() -> Self {
        let mut tree = Self::new();
        let builtins = [
            ("/datum", None),
            ("/atom", Some("/datum")),
            ("/atom/movable", None),
            ("/area", Some("/atom")),
            ("/turf", Some("/atom")),
            ("/obj", Some("/atom/movable")),
            ("/mob", Some("/atom/movable")),
            ("/list", None),
        ];
        for (path, parent) in builtins {
            let path = TypePath::parse(path).expect("builtin path is valid");
            let parent = parent.map(|p| TypePath::parse(p).expect("builtin path is valid"));
            tree.create_class(&path, parent.as_ref())
                .expect("builtin hierarchy is acyclic");
        }
        tree
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn root(&self) -> ClassId {
        ClassId::ROOT
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassNode> {
        self.classes.node_weight(NodeIndex::from(id))
    }

    /// Like [`class`](Self::class) but returns [`CoreError::ClassNotFound`].
    pub fn try_class(&self, id: ClassId) -> Result<&ClassNode, CoreError> {
        self.class(id).ok_or(CoreError::ClassNotFound { id })
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> Result<&mut ClassNode, CoreError> {
        self.classes
            .node_weight_mut(NodeIndex::from(id))
            .ok_or(CoreError::ClassNotFound { id })
    }

    pub fn lookup_path(&self, path: &TypePath) -> Option<ClassId> {
        self.paths.get(path).copied()
    }

    /// Looks up a class by path string. Malformed paths are reported as errors.
    pub fn lookup(&self, path: &str) -> Result<ClassId, CoreError> {
        let path = TypePath::parse(path)?;
        self.lookup_path(&path)
            .ok_or(CoreError::PathNotFound { path })
    }

    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).and_then(|c| c.parent)
    }

    /// Direct children of a class, in creation order.
    pub fn children(&self, id: ClassId) -> Vec<ClassId> {
        let mut children: Vec<ClassId> = self
            .classes
            .neighbors_directed(NodeIndex::from(id), Direction::Outgoing)
            .map(ClassId::from)
            .collect();
        children.sort();
        children
    }

    /// The class itself followed by each ancestor up to and including the root.
    pub fn lineage(&self, id: ClassId) -> Lineage<'_> {
        Lineage {
            tree: self,
            next: self.class(id).map(|c| c.id),
        }
    }

    /// All classes in id order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.node_weights()
    }

    pub fn class_count(&self) -> usize {
        self.classes.node_count()
    }

    pub(crate) fn graph(&self) -> &Graph<ClassNode, Inherits, Directed, u32> {
        &self.classes
    }

    // -----------------------------------------------------------------------
    // Class creation
    // -----------------------------------------------------------------------

    /// Returns the class at `path`, creating it and any missing ancestors.
    ///
    /// Implicitly created classes inherit from their path parent.
    pub fn get_or_create(&mut self, path: &TypePath) -> Result<ClassId, CoreError> {
        if let Some(id) = self.lookup_path(path) {
            return Ok(id);
        }
        // Missing paths are never the root, so a path parent always exists.
        let parent_path = path.parent().unwrap_or_else(TypePath::root);
        let parent = self.get_or_create(&parent_path)?;
        Ok(self.insert_class(path.clone(), parent))
    }

    /// Declares a class, optionally with an explicit parent (`parent_type`).
    ///
    /// Re-declaring an existing class is allowed as long as the requested
    /// parent matches; a class cannot be reparented after creation.
    pub fn create_class(
        &mut self,
        path: &TypePath,
        parent: Option<&TypePath>,
    ) -> Result<ClassId, CoreError> {
        let Some(parent_path) = parent else {
            return self.get_or_create(path);
        };

        if parent_path == path || parent_path.is_descendant_of(path) {
            return Err(CoreError::InheritanceCycle {
                path: path.clone(),
                parent: parent_path.clone(),
            });
        }

        let parent_id = self.get_or_create(parent_path)?;
        if let Some(existing) = self.lookup_path(path) {
            let current = self.parent(existing);
            if current != Some(parent_id) {
                let existing_parent = current
                    .and_then(|p| self.class(p))
                    .map(|c| c.path.clone())
                    .unwrap_or_else(TypePath::root);
                return Err(CoreError::Reparent {
                    path: path.clone(),
                    existing: existing_parent,
                });
            }
            return Ok(existing);
        }

        Ok(self.insert_class(path.clone(), parent_id))
    }

    fn insert_class(&mut self, path: TypePath, parent: ClassId) -> ClassId {
        let id = ClassId(self.classes.node_count() as u32);
        let idx = self
            .classes
            .add_node(ClassNode::new(id, path.clone(), Some(parent)));
        debug_assert_eq!(ClassId::from(idx), id);
        self.classes.add_edge(NodeIndex::from(parent), idx, Inherits);
        tracing::debug!(class = %path, id = id.0, parent = parent.0, "created class");
        self.paths.insert(path, id);
        id
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    /// Declares a new instance variable directly on `class`.
    ///
    /// Re-declaring an own variable replaces it. A name already used by an
    /// override on the same class is a [`CoreError::VariableConflict`].
    pub fn declare_var(&mut self, class: ClassId, var: Variable) -> Result<(), CoreError> {
        let node = self.class_mut(class)?;
        if node.variable_overrides.contains_key(&var.name) {
            return Err(CoreError::VariableConflict {
                path: node.path.clone(),
                name: var.name,
                existing: "an override",
            });
        }
        set_flag(&mut node.const_variables, &var.name, var.is_const);
        node.variables.insert(var.name.clone(), var);
        Ok(())
    }

    /// Declares an override of an inherited variable on `class`.
    pub fn declare_override(&mut self, class: ClassId, var: Variable) -> Result<(), CoreError> {
        let node = self.class_mut(class)?;
        if node.variables.contains_key(&var.name) {
            return Err(CoreError::VariableConflict {
                path: node.path.clone(),
                name: var.name,
                existing: "an own variable",
            });
        }
        set_flag(&mut node.const_variables, &var.name, var.is_const);
        node.variable_overrides.insert(var.name.clone(), var);
        Ok(())
    }

    /// Sets or clears the `tmp` (not saved) flag of a variable name.
    pub fn set_tmp(&mut self, class: ClassId, name: &str, is_tmp: bool) -> Result<(), CoreError> {
        set_flag(&mut self.class_mut(class)?.tmp_variables, name, is_tmp);
        Ok(())
    }

    /// Allocates a global slot and binds it to `name` on `class`.
    pub fn create_global_var(
        &mut self,
        class: ClassId,
        name: &str,
        type_path: Option<TypePath>,
        is_const: bool,
        value_type: ComplexValueType,
    ) -> Result<GlobalId, CoreError> {
        // Check the class first so a bad id does not leak a slot.
        self.try_class(class)?;
        let id = self.globals.create(name, type_path, is_const, value_type);
        self.class_mut(class)?
            .global_variables
            .insert(name.to_string(), id);
        Ok(id)
    }

    /// Sets a global's initial value; `location` is where build errors
    /// about the value point.
    pub fn set_global_value(
        &mut self,
        id: GlobalId,
        value: Expr,
        location: Location,
    ) -> Result<(), CoreError> {
        let slot = self.globals.get_mut(id)?;
        slot.value = Some(value);
        slot.location = location;
        Ok(())
    }

    /// Registers a proc declared on `class`. Verbs are also recorded in the
    /// class's verb list.
    pub fn add_proc(
        &mut self,
        class: ClassId,
        name: &str,
        attributes: ProcAttributes,
        return_type: Option<ComplexValueType>,
    ) -> Result<ProcId, CoreError> {
        self.try_class(class)?;
        let id = self
            .procs
            .register(class, Some(name.to_string()), attributes, return_type);
        let node = self.class_mut(class)?;
        node.add_proc(name, id);
        if attributes.is_verb {
            node.verbs.push(id);
        }
        Ok(id)
    }

    /// Registers a free-standing global proc (`/proc/name()`).
    pub fn add_global_proc(
        &mut self,
        name: &str,
        return_type: Option<ComplexValueType>,
    ) -> Result<ProcId, CoreError> {
        self.procs.register_global(name, return_type)
    }

    /// Queues an expression for the class's implicit initializer.
    pub fn push_init_expr(&mut self, class: ClassId, expr: InitExpr) -> Result<(), CoreError> {
        self.class_mut(class)?.init_exprs.push(expr);
        Ok(())
    }
}

fn set_flag(names: &mut IndexSet<String>, name: &str, on: bool) {
    if on {
        names.insert(name.to_string());
    } else {
        names.shift_remove(name);
    }
}

impl Default for ObjectTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a class and its ancestors, nearest first.
pub struct Lineage<'a> {
    tree: &'a ObjectTree,
    next: Option<ClassId>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a ClassNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.class(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
