//! Artifact emission: the serialized object tree read by the runtime loader.
//!
//! [`ObjectTree::emit_class`] produces one [`TypeArtifact`] per class and
//! [`ObjectTree::emit_tree`] the whole [`CompiledTree`]. Emission never stops
//! at the first problem. Every [`BuildError`] in the tree is collected and
//! returned together, and no artifact is produced if there is any.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::class::{ClassNode, ProcIds};
use crate::error::{BuildError, CoreError};
use crate::id::{ClassId, GlobalId, ProcId};
use crate::proc::{ProcAttributes, ProcDef};
use crate::tree::ObjectTree;
use crate::value_type::ComplexValueType;
use crate::variable::Variable;

/// Options controlling artifact output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOptions {
    /// Pretty-print the JSON output.
    pub pretty: bool,
}

/// Compiled form of one class.
///
/// Optional fields are omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeArtifact {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ClassId>,
    /// Own variables then overrides; an override replaces a same-named entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_variables: Option<IndexMap<String, GlobalId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_variables: Option<IndexSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmp_variables: Option<IndexSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_proc: Option<ProcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procs: Option<Vec<ProcIds>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbs: Option<Vec<ProcId>>,
}

/// Compiled form of one proc's metadata. Bodies are emitted separately by
/// the code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcArtifact {
    pub id: ProcId,
    pub owner: ClassId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub attributes: ProcAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ComplexValueType>,
}

/// Compiled form of one global slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalArtifact {
    pub id: GlobalId,
    pub name: String,
    pub is_const: bool,
    pub value: serde_json::Value,
}

/// Everything the runtime loader needs to rebuild the type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompiledTree {
    /// Indexed by class id.
    pub types: Vec<TypeArtifact>,
    /// Indexed by proc id.
    pub procs: Vec<ProcArtifact>,
    /// Indexed by global id.
    pub globals: Vec<GlobalArtifact>,
}

impl CompiledTree {
    pub fn to_json(&self, options: &EmitOptions) -> Result<String, serde_json::Error> {
        if options.pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl ObjectTree {
    /// Emits the compiled record for a single class.
    ///
    /// Fails with every build error found on the class, or with a
    /// [`CoreError`] if the id is unknown.
    pub fn emit_class(&self, class: ClassId) -> Result<TypeArtifact, EmitError> {
        let node = self.try_class(class)?;
        let mut errors = Vec::new();
        let artifact = self.emit_node(node, &mut errors);
        if errors.is_empty() {
            Ok(artifact)
        } else {
            Err(EmitError::Build(errors))
        }
    }

    /// Emits the whole tree, reporting all build errors at once.
    pub fn emit_tree(&self) -> Result<CompiledTree, Vec<BuildError>> {
        let mut errors = Vec::new();

        let types: Vec<TypeArtifact> = self
            .classes()
            .map(|node| self.emit_node(node, &mut errors))
            .collect();

        let procs = self.procs.iter().map(emit_proc).collect();

        let mut globals = Vec::with_capacity(self.globals.len());
        for slot in self.globals.iter() {
            let value = match &slot.value {
                None => Some(serde_json::Value::Null),
                Some(expr) => expr.try_as_literal(),
            };
            match value {
                Some(value) => globals.push(GlobalArtifact {
                    id: slot.id,
                    name: slot.name.clone(),
                    is_const: slot.is_const,
                    value,
                }),
                None => errors.push(BuildError::UnrepresentableGlobal {
                    name: slot.name.clone(),
                    id: slot.id,
                    location: slot.location.clone(),
                }),
            }
        }

        if !errors.is_empty() {
            for error in &errors {
                tracing::warn!(%error, "build error");
            }
            return Err(errors);
        }

        tracing::debug!(
            types = types.len(),
            procs = self.procs.len(),
            globals = globals.len(),
            "emitted object tree"
        );
        Ok(CompiledTree {
            types,
            procs,
            globals,
        })
    }

    fn emit_node(&self, node: &ClassNode, errors: &mut Vec<BuildError>) -> TypeArtifact {
        let variables = if node.variables.is_empty() && node.variable_overrides.is_empty() {
            None
        } else {
            let mut map = IndexMap::new();
            for var in node.variables.values().chain(node.variable_overrides.values()) {
                if let Some(value) = self.emit_variable(node, var, errors) {
                    map.insert(var.name.clone(), value);
                }
            }
            Some(map)
        };

        TypeArtifact {
            path: node.path.to_string(),
            parent: node.parent,
            variables,
            global_variables: non_empty_map(&node.global_variables),
            const_variables: non_empty_set(&node.const_variables),
            tmp_variables: non_empty_set(&node.tmp_variables),
            init_proc: node.init_proc,
            procs: if node.procs.is_empty() {
                None
            } else {
                Some(node.procs.values().cloned().collect())
            },
            verbs: if node.verbs.is_empty() {
                None
            } else {
                Some(node.verbs.clone())
            },
        }
    }

    fn emit_variable(
        &self,
        node: &ClassNode,
        var: &Variable,
        errors: &mut Vec<BuildError>,
    ) -> Option<serde_json::Value> {
        if let Some(type_path) = &var.type_path {
            if self.lookup_path(type_path).is_none() {
                errors.push(BuildError::UnknownTypePath {
                    path: node.path.clone(),
                    name: var.name.clone(),
                    type_path: type_path.clone(),
                    location: var.location.clone(),
                });
            }
        }

        let value = var.try_as_json();
        if value.is_none() {
            errors.push(BuildError::UnrepresentableValue {
                path: node.path.clone(),
                name: var.name.clone(),
                location: var.location.clone(),
            });
        }
        value
    }
}

/// Failure emitting a single class.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{} build error(s)", .0.len())]
    Build(Vec<BuildError>),
}

fn emit_proc(proc: &ProcDef) -> ProcArtifact {
    ProcArtifact {
        id: proc.id,
        owner: proc.owner,
        name: proc.name.clone(),
        attributes: proc.attributes,
        return_type: proc.return_type.clone(),
    }
}

fn non_empty_map<V: Clone>(map: &IndexMap<String, V>) -> Option<IndexMap<String, V>> {
    if map.is_empty() {
        None
    } else {
        Some(map.clone())
    }
}

fn non_empty_set(set: &IndexSet<String>) -> Option<IndexSet<String>> {
    if set.is_empty() {
        None
    } else {
        Some(set.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, Location};
    use crate::path::TypePath;
    use serde_json::json;

    #[test]
    fn root_has_no_parent_and_no_optional_fields() {
        let tree = ObjectTree::new();
        let artifact = tree.emit_class(ClassId::ROOT).unwrap();
        assert_eq!(artifact.parent, None);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json, json!({ "Path": "/" }));
    }

    #[test]
    fn overrides_replace_base_entries_under_the_same_key() {
        let mut tree = ObjectTree::new();
        let mob = tree.get_or_create(&TypePath::mob()).unwrap();
        tree.declare_var(mob, Variable::new("hp").with_value(Expr::num(10.0))).unwrap();
        tree.declare_override(mob, Variable::new("name").with_value(Expr::text("mob")))
            .unwrap();

        let artifact = tree.emit_class(mob).unwrap();
        let vars = artifact.variables.unwrap();
        assert_eq!(vars.get("hp"), Some(&json!(10)));
        assert_eq!(vars.get("name"), Some(&json!("mob")));
        assert_eq!(artifact.parent, Some(ClassId::ROOT));
    }

    #[test]
    fn ancestors_variables_are_not_serialized() {
        let mut tree = ObjectTree::new();
        let mob = tree.get_or_create(&TypePath::mob()).unwrap();
        let player = tree.get_or_create(&TypePath::parse("/mob/player").unwrap()).unwrap();
        tree.declare_var(mob, Variable::new("hp")).unwrap();

        let artifact = tree.emit_class(player).unwrap();
        assert!(artifact.variables.is_none());
    }

    #[test]
    fn unrepresentable_value_is_a_build_error() {
        let mut tree = ObjectTree::new();
        let mob = tree.get_or_create(&TypePath::mob()).unwrap();
        tree.declare_var(
            mob,
            Variable::new("target")
                .with_value(Expr::Call {
                    name: "locate".into(),
                    args: vec![],
                })
                .at(Location::new("mob.dm", 7, 2)),
        )
        .unwrap();

        match tree.emit_class(mob) {
            Err(EmitError::Build(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors[0],
                    BuildError::UnrepresentableValue {
                        path: TypePath::mob(),
                        name: "target".into(),
                        location: Location::new("mob.dm", 7, 2),
                    }
                );
                assert_eq!(
                    errors[0].to_string(),
                    "mob.dm:7:2: failed to serialize /mob.target: value is not a compile-time literal"
                );
            }
            other => panic!("expected build error, got {other:?}"),
        }
    }

    #[test]
    fn emit_tree_collects_errors_from_every_class() {
        let mut tree = ObjectTree::new();
        let mob = tree.get_or_create(&TypePath::mob()).unwrap();
        let obj = tree.get_or_create(&TypePath::obj()).unwrap();
        tree.declare_var(mob, Variable::new("a").with_value(Expr::Global("x".into())))
            .unwrap();
        tree.declare_var(obj, Variable::new("b").with_type(TypePath::parse("/nope").unwrap()))
            .unwrap();
        let slot = tree
            .create_global_var(obj, "g", None, false, ComplexValueType::anything())
            .unwrap();
        tree.set_global_value(slot, Expr::num(f64::NAN), Location::new("obj.dm", 7, 3))
            .unwrap();

        let errors = tree.emit_tree().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], BuildError::UnrepresentableValue { .. }));
        assert!(matches!(errors[1], BuildError::UnknownTypePath { .. }));
        assert!(matches!(
            &errors[2],
            BuildError::UnrepresentableGlobal { location, .. } if *location == Location::new("obj.dm", 7, 3)
        ));
    }

    #[test]
    fn unknown_class_is_a_core_error() {
        let tree = ObjectTree::new();
        assert!(matches!(
            tree.emit_class(ClassId(3)),
            Err(EmitError::Core(CoreError::ClassNotFound { .. }))
        ));
    }

    #[test]
    fn compact_and_pretty_output() {
        let tree = ObjectTree::new();
        let compiled = tree.emit_tree().unwrap();
        let compact = compiled.to_json(&EmitOptions::default()).unwrap();
        assert_eq!(compact, r#"{"Types":[{"Path":"/"}],"Procs":[],"Globals":[]}"#);

        let pretty = compiled.to_json(&EmitOptions { pretty: true }).unwrap();
        assert!(pretty.contains('\n'));
        let back: CompiledTree = serde_json::from_str(&pretty).unwrap();
        assert_eq!(back, compiled);
    }
}
