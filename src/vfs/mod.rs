//! Virtual File System
//!
//! A static directory tree: absolute directory paths mapped to the ordered
//! names they contain. A child is a directory when its joined path is itself
//! a key; everything else is a file whose bytes live with the content
//! collaborator.
//!
//! Design: validated once at construction, never mutated afterwards.
//!
//! Name matching is deliberately asymmetric: navigation (`cd`) ignores case,
//! file access (`cat`, `view`, `run`) does not.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Filesystem errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// No directory at this path
    NotFound(String),
    /// The tree breaks a structural rule
    Invalid(String),
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(p) => write!(f, "not found: {}", p),
            FsError::Invalid(s) => write!(f, "invalid directory tree: {}", s),
        }
    }
}

impl std::error::Error for FsError {}

/// Join a directory path and a child name
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

type DirMap = BTreeMap<String, Vec<String>>;

/// The static directory hierarchy.
///
/// Serialized as a plain `{path: [names]}` map; deserializing validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DirMap", into = "DirMap")]
pub struct DirectoryTree {
    dirs: DirMap,
}

impl TryFrom<DirMap> for DirectoryTree {
    type Error = FsError;

    fn try_from(dirs: DirMap) -> Result<Self, FsError> {
        let tree = Self { dirs };
        tree.validate()?;
        Ok(tree)
    }
}

impl From<DirectoryTree> for DirMap {
    fn from(tree: DirectoryTree) -> Self {
        tree.dirs
    }
}

impl DirectoryTree {
    /// Build a tree from `(path, children)` pairs, validating it
    pub fn new<I, P, C, N>(entries: I) -> Result<Self, FsError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let dirs: DirMap = entries
            .into_iter()
            .map(|(path, children)| (path.into(), children.into_iter().map(Into::into).collect()))
            .collect();
        Self::try_from(dirs)
    }

    /// Parse and validate a tree from JSON (`{"/": ["files"], "/files": []}`)
    pub fn from_json(json: &str) -> Result<Self, FsError> {
        serde_json::from_str(json).map_err(|e| FsError::Invalid(e.to_string()))
    }

    /// The tree the terminal ships with
    pub fn default_layout() -> Self {
        Self {
            dirs: BTreeMap::from([
                (
                    "/".to_string(),
                    vec!["files".into(), "programs".into(), "images".into()],
                ),
                (
                    "/files".to_string(),
                    vec!["AboutMe.txt".into(), "Notes.txt".into(), "Bible.txt".into()],
                ),
                ("/programs".to_string(), vec!["fordjohnson".into()]),
                (
                    "/images".to_string(),
                    vec!["Workstation.jpg".into(), "Portrait.jpeg".into()],
                ),
            ]),
        }
    }

    /// Check the structural rules every navigable path relies on
    pub fn validate(&self) -> Result<(), FsError> {
        if !self.dirs.contains_key("/") {
            return Err(FsError::Invalid("missing root directory".into()));
        }

        for (path, children) in &self.dirs {
            if !path.starts_with('/') || (path != "/" && path.ends_with('/')) {
                return Err(FsError::Invalid(format!("'{}' is not an absolute path", path)));
            }

            let mut seen = HashSet::new();
            for child in children {
                if child.is_empty() || child.contains('/') || child == ".." {
                    return Err(FsError::Invalid(format!("bad name '{}' in {}", child, path)));
                }
                if !seen.insert(child.as_str()) {
                    return Err(FsError::Invalid(format!("'{}' listed twice in {}", child, path)));
                }
            }

            if path != "/" {
                let parent = self.resolve_parent(path);
                let name = &path[path.rfind('/').map(|i| i + 1).unwrap_or(0)..];
                let listed = self
                    .dirs
                    .get(&parent)
                    .is_some_and(|c| c.iter().any(|n| n == name));
                if !listed {
                    return Err(FsError::Invalid(format!(
                        "{} is not listed by its parent {}",
                        path, parent
                    )));
                }
            }
        }

        Ok(())
    }

    /// Names in a directory, in listing order
    pub fn listing(&self, path: &str) -> Result<&[String], FsError> {
        self.dirs
            .get(path)
            .map(|c| c.as_slice())
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.dirs.contains_key(path)
    }

    /// Resolve a subdirectory for navigation.
    ///
    /// An exact name wins; otherwise the first case-insensitive match is
    /// taken. Only directories resolve.
    pub fn resolve_child(&self, path: &str, name: &str) -> Result<String, FsError> {
        let children = self.listing(path)?;
        let exact = children.iter().find(|c| c.as_str() == name);
        let found = exact.or_else(|| children.iter().find(|c| c.eq_ignore_ascii_case(name)));

        match found {
            Some(child) if self.is_dir(&join(path, child)) => Ok(join(path, child)),
            _ => Err(FsError::NotFound(join(path, name))),
        }
    }

    /// The parent directory. The root is its own parent.
    pub fn resolve_parent(&self, path: &str) -> String {
        match path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(i) => path[..i].to_string(),
        }
    }

    /// Resolve a file for reading. Case-sensitive; directories never match.
    pub fn find_file(&self, path: &str, name: &str) -> Option<String> {
        let children = self.dirs.get(path)?;
        if !children.iter().any(|c| c == name) {
            return None;
        }
        let full = join(path, name);
        (!self.is_dir(&full)).then_some(full)
    }
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::default_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        assert!(DirectoryTree::default_layout().validate().is_ok());
    }

    #[test]
    fn test_listing() {
        let tree = DirectoryTree::default();
        assert_eq!(tree.listing("/").unwrap(), ["files", "programs", "images"]);
        assert_eq!(
            tree.listing("/files").unwrap(),
            ["AboutMe.txt", "Notes.txt", "Bible.txt"]
        );
        assert!(matches!(tree.listing("/nope"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_resolve_child_ignores_case() {
        let tree = DirectoryTree::default();
        assert_eq!(tree.resolve_child("/", "files").unwrap(), "/files");
        assert_eq!(tree.resolve_child("/", "PROGRAMS").unwrap(), "/programs");
        assert!(tree.resolve_child("/", "nope").is_err());
    }

    #[test]
    fn test_resolve_child_rejects_files() {
        let tree = DirectoryTree::default();
        assert!(tree.resolve_child("/files", "Notes.txt").is_err());
    }

    #[test]
    fn test_resolve_parent() {
        let tree = DirectoryTree::default();
        assert_eq!(tree.resolve_parent("/files"), "/");
        assert_eq!(tree.resolve_parent("/"), "/");
        assert_eq!(tree.resolve_parent("/a/b"), "/a");
    }

    #[test]
    fn test_find_file_is_case_sensitive() {
        let tree = DirectoryTree::default();
        assert_eq!(
            tree.find_file("/files", "Notes.txt").as_deref(),
            Some("/files/Notes.txt")
        );
        assert_eq!(tree.find_file("/files", "notes.txt"), None);
        assert_eq!(tree.find_file("/", "files"), None);
    }

    #[test]
    fn test_nested_tree() {
        let tree = DirectoryTree::new([
            ("/", vec!["a"]),
            ("/a", vec!["b", "x.txt"]),
            ("/a/b", vec![]),
        ])
        .unwrap();
        assert_eq!(tree.resolve_child("/a", "B").unwrap(), "/a/b");
        assert_eq!(tree.find_file("/a", "x.txt").as_deref(), Some("/a/x.txt"));
    }

    #[test]
    fn test_validate_rejects_orphans() {
        let err = DirectoryTree::new([("/", vec!["a"]), ("/b", vec![])]).unwrap_err();
        assert!(matches!(err, FsError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let result = DirectoryTree::new([("/a", Vec::<String>::new())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(DirectoryTree::new([("/", vec!["a", "a"])]).is_err());
    }

    #[test]
    fn test_from_json() {
        let tree = DirectoryTree::from_json(r#"{"/": ["docs"], "/docs": ["readme.txt"]}"#).unwrap();
        assert_eq!(tree.listing("/docs").unwrap(), ["readme.txt"]);

        assert!(DirectoryTree::from_json(r#"{"/docs": []}"#).is_err());
        assert!(DirectoryTree::from_json("not json").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let orphan = serde_json::from_str::<DirectoryTree>(r#"{"/": ["a"], "/b": []}"#);
        assert!(orphan.is_err());
        let rootless = serde_json::from_str::<DirectoryTree>(r#"{"/a": []}"#);
        assert!(rootless.is_err());

        let tree = DirectoryTree::default();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.starts_with(r#"{"/":["files","programs","images"]"#));
        assert_eq!(serde_json::from_str::<DirectoryTree>(&json).unwrap(), tree);
    }
}
