//! Hierarchical type paths (`/`, `/obj`, `/obj/item`).
//!
//! A [`TypePath`] names a class by its position in the inheritance tree.
//! Paths are validated on construction so the rest of the crate can treat
//! them as well-formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An absolute, validated type path.
///
/// The root is `/`. Every other path is one or more `/`-prefixed segments of
/// ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypePath(String);

impl TypePath {
    pub const ROOT_STR: &'static str = "/";

    pub fn root() -> Self {
        TypePath(Self::ROOT_STR.to_string())
    }

    pub fn datum() -> Self {
        TypePath("/datum".to_string())
    }

    pub fn atom() -> Self {
        TypePath("/atom".to_string())
    }

    pub fn area() -> Self {
        TypePath("/area".to_string())
    }

    pub fn turf() -> Self {
        TypePath("/turf".to_string())
    }

    pub fn obj() -> Self {
        TypePath("/obj".to_string())
    }

    pub fn mob() -> Self {
        TypePath("/mob".to_string())
    }

    pub fn list() -> Self {
        TypePath("/list".to_string())
    }

    /// Parses and validates a path string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw == Self::ROOT_STR {
            return Ok(Self::root());
        }

        let Some(rest) = raw.strip_prefix('/') else {
            return Err(CoreError::InvalidPath {
                path: raw.to_string(),
                reason: "path must start with '/'".into(),
            });
        };

        for segment in rest.split('/') {
            check_segment(raw, segment)?;
        }

        Ok(TypePath(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT_STR
    }

    /// The path's segments, root-first. The root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The last segment, or `None` for the root.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The path one level up. `/obj` → `/`, root → `None`.
    pub fn parent(&self) -> Option<TypePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(TypePath(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Appends a single segment. A segment containing `/` is rejected.
    pub fn join(&self, segment: &str) -> Result<TypePath, CoreError> {
        let joined = if self.is_root() {
            format!("/{segment}")
        } else {
            format!("{}/{segment}", self.0)
        };
        check_segment(&joined, segment)?;
        Ok(TypePath(joined))
    }

    /// True if `self` lies strictly below `other` in path terms
    /// (`/obj/item` is below `/obj` and below `/`).
    pub fn is_descendant_of(&self, other: &TypePath) -> bool {
        if self == other {
            return false;
        }
        if other.is_root() {
            return true;
        }
        self.0
            .strip_prefix(other.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Every proper ancestor path, nearest first, ending with the root.
    pub fn ancestors(&self) -> Vec<TypePath> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(path) = current {
            current = path.parent();
            out.push(path);
        }
        out
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TypePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypePath::parse(s)
    }
}

impl TryFrom<String> for TypePath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypePath::parse(&value)
    }
}

impl From<TypePath> for String {
    fn from(path: TypePath) -> Self {
        path.0
    }
}

fn check_segment(path: &str, segment: &str) -> Result<(), CoreError> {
    if segment.is_empty() {
        return Err(CoreError::InvalidPath {
            path: path.to_string(),
            reason: "empty path segment".into(),
        });
    }
    if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CoreError::InvalidPath {
            path: path.to_string(),
            reason: format!("invalid character in segment '{segment}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_paths() {
        assert!(TypePath::parse("/").unwrap().is_root());
        assert_eq!(TypePath::parse("/obj/item").unwrap().as_str(), "/obj/item");
        assert_eq!(TypePath::parse("/mob/player_2").unwrap().last_segment(), Some("player_2"));
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        for raw in ["", "obj", "/obj/", "//obj", "/obj//item", "/obj/it em", "/obj/item-1"] {
            match TypePath::parse(raw) {
                Err(CoreError::InvalidPath { path, .. }) => assert_eq!(path, raw),
                other => panic!("expected InvalidPath for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parent_chain() {
        let path = TypePath::parse("/obj/item/weapon").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "/obj/item");
        assert_eq!(TypePath::obj().parent(), Some(TypePath::root()));
        assert_eq!(TypePath::root().parent(), None);

        let ancestors: Vec<String> = path.ancestors().into_iter().map(String::from).collect();
        assert_eq!(ancestors, vec!["/obj/item", "/obj", "/"]);
    }

    #[test]
    fn descendant_check_respects_segment_boundaries() {
        let item = TypePath::parse("/obj/item").unwrap();
        assert!(item.is_descendant_of(&TypePath::obj()));
        assert!(item.is_descendant_of(&TypePath::root()));
        assert!(!item.is_descendant_of(&item));
        assert!(!TypePath::parse("/objective").unwrap().is_descendant_of(&TypePath::obj()));
        assert!(!TypePath::root().is_descendant_of(&TypePath::root()));
    }

    #[test]
    fn join_segments() {
        assert_eq!(TypePath::root().join("mob").unwrap(), TypePath::mob());
        assert_eq!(TypePath::mob().join("player").unwrap().as_str(), "/mob/player");
        assert!(TypePath::mob().join("bad/seg").is_err());
        assert!(TypePath::root().join("").is_err());
        assert!(matches!(
            TypePath::mob().join("a-b"),
            Err(CoreError::InvalidPath { .. })
        ));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let path: TypePath = serde_json::from_str("\"/area/space\"").unwrap();
        assert_eq!(path.as_str(), "/area/space");
        assert!(serde_json::from_str::<TypePath>("\"area\"").is_err());
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"/area/space\"");
    }
}
