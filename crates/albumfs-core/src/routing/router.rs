//! Path resolution against the pattern table.

use super::kind::CollectionKind;
use super::lister::{ListEntry, Lister};
use super::path;
use super::pattern::{PatternTable, Role, Rule, Style};
use crate::vfs::{VfsError, VfsResult};

/// Outcome of resolving one path. Borrowed from the table, discarded after use.
#[derive(Clone, Debug)]
pub struct RouteMatch<'a> {
    /// Capture groups: 0 is the whole path, 1 the collection, 2 the item.
    pub captures: Vec<String>,
    /// Path below the mount root, with one trailing `/` when non-empty.
    pub prefix: String,
    /// The winning rule.
    pub rule: &'a Rule,
}

impl<'a> RouteMatch<'a> {
    pub fn role(&self) -> Role {
        self.rule.role()
    }

    pub fn kind(&self) -> Option<CollectionKind> {
        self.rule.collection_kind()
    }

    /// Collection name, for collection and item routes.
    pub fn collection(&self) -> Option<&str> {
        self.captures.get(1).map(String::as_str)
    }

    /// Item name, for item routes.
    pub fn item(&self) -> Option<&str> {
        self.captures.get(2).map(String::as_str)
    }

    /// Qualify a child name so it is relative to the mount root.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Produce the directory contents for this route.
    pub async fn list(&self, lister: &dyn Lister) -> VfsResult<Vec<ListEntry>> {
        match (self.role(), self.kind()) {
            (Role::Root, _) => {
                let mtime = lister.dir_time();
                Ok(CollectionKind::ALL
                    .iter()
                    .map(|kind| ListEntry::directory(self.qualify(kind.as_str()), mtime))
                    .collect())
            }
            (Role::KindRoot, Some(kind)) => lister.list_collections(&self.prefix, kind).await,
            (Role::Collection, Some(kind)) => {
                let collection = self
                    .collection()
                    .ok_or_else(|| VfsError::invalid_path(self.captures[0].clone()))?;
                lister.list_items(&self.prefix, kind, collection).await
            }
            (Role::Item, _) => Err(VfsError::not_a_directory(self.captures[0].clone())),
            (role, None) => Err(VfsError::other(format!("{role} route has no collection kind"))),
        }
    }
}

impl PatternTable {
    /// Resolve `path` below `root`.
    ///
    /// Only rules of the requested `style` are candidates, and the first one
    /// (in declaration order) whose pattern matches wins. `None` means the
    /// path does not exist in the virtual hierarchy.
    pub fn resolve(&self, root: &str, path: &str, style: Style) -> Option<RouteMatch<'_>> {
        let root = path::normalize_root(root);
        let abs = path::join(&root, path::trim_separators(path));
        if !path::is_within(&root, &abs) {
            return None;
        }

        let mut prefix = path::trim_separators(&abs[root.len()..]).to_string();
        if !prefix.is_empty() {
            prefix.push('/');
        }

        self.rules()
            .iter()
            .filter(|rule| rule.style() == style)
            .find_map(|rule| {
                rule.captures(&abs).map(|captures| RouteMatch {
                    captures,
                    prefix: prefix.clone(),
                    rule,
                })
            })
    }

    /// Resolve with the file/directory choice given as a flag.
    pub fn resolve_flag(&self, root: &str, path: &str, want_file: bool) -> Option<RouteMatch<'_>> {
        self.resolve(root, path, Style::from_is_file(want_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::SystemTime;

    /// Lister that reports what it was asked for.
    struct EchoLister;

    #[async_trait]
    impl Lister for EchoLister {
        async fn list_collections(
            &self,
            prefix: &str,
            kind: CollectionKind,
        ) -> VfsResult<Vec<ListEntry>> {
            Ok(vec![ListEntry::directory(
                format!("{prefix}{kind}-collection"),
                self.dir_time(),
            )])
        }

        async fn list_items(
            &self,
            prefix: &str,
            kind: CollectionKind,
            collection: &str,
        ) -> VfsResult<Vec<ListEntry>> {
            Ok(vec![ListEntry::file(
                format!("{prefix}{kind}-{collection}.jpg"),
                0,
                self.dir_time(),
            )])
        }

        fn dir_time(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH
        }
    }

    #[test]
    fn test_resolve_root() {
        let table = PatternTable::builtin();
        let m = table.resolve("", "", Style::Directory).unwrap();
        assert_eq!(m.role(), Role::Root);
        assert_eq!(m.prefix, "");
        assert!(table.resolve("", "", Style::File).is_none());
    }

    #[test]
    fn test_resolve_kind_root() {
        let table = PatternTable::builtin();
        let m = table.resolve("", "album", Style::Directory).unwrap();
        assert_eq!(m.role(), Role::KindRoot);
        assert_eq!(m.kind(), Some(CollectionKind::Album));
        assert_eq!(m.captures, vec!["album"]);
        assert!(m.collection().is_none());
        assert_eq!(m.prefix, "album/");
    }

    #[test]
    fn test_resolve_collection() {
        let table = PatternTable::builtin();
        let m = table.resolve("", "album/Vacation", Style::Directory).unwrap();
        assert_eq!(m.role(), Role::Collection);
        assert_eq!(m.collection(), Some("Vacation"));
        assert!(m.rule.can_create_collection());
        assert!(!m.rule.can_upload());
    }

    #[test]
    fn test_resolve_item() {
        let table = PatternTable::builtin();
        let m = table
            .resolve("", "album/Vacation/img1.jpg", Style::File)
            .unwrap();
        assert_eq!(m.role(), Role::Item);
        assert_eq!(m.collection(), Some("Vacation"));
        assert_eq!(m.item(), Some("img1.jpg"));
        assert!(m.rule.can_upload());
    }

    #[test]
    fn test_collection_path_is_not_a_file() {
        let table = PatternTable::builtin();
        assert!(table.resolve("", "album/Vacation", Style::File).is_none());
        assert!(table.resolve_flag("", "playlist/Frame", true).is_none());
    }

    #[test]
    fn test_separators_are_trimmed() {
        let table = PatternTable::builtin();
        let m = table
            .resolve("", "/playlist/Frame/", Style::Directory)
            .unwrap();
        assert_eq!(m.role(), Role::Collection);
        assert_eq!(m.kind(), Some(CollectionKind::Playlist));
        assert_eq!(m.collection(), Some("Frame"));
    }

    #[test]
    fn test_unknown_paths() {
        let table = PatternTable::builtin();
        assert!(table.resolve("", "photos", Style::Directory).is_none());
        assert!(table.resolve("", "albums/x", Style::Directory).is_none());
        assert!(table.resolve("", "photos/x/y.jpg", Style::File).is_none());
    }

    #[test]
    fn test_rooted_resolve() {
        let table = PatternTable::builtin();

        let m = table
            .resolve("album", "Vacation/img1.jpg", Style::File)
            .unwrap();
        assert_eq!(m.collection(), Some("Vacation"));
        assert_eq!(m.item(), Some("img1.jpg"));

        let m = table.resolve("album", "Vacation", Style::Directory).unwrap();
        assert_eq!(m.role(), Role::Collection);
        assert_eq!(m.prefix, "Vacation/");

        let m = table.resolve("album", "", Style::Directory).unwrap();
        assert_eq!(m.role(), Role::KindRoot);
        assert_eq!(m.prefix, "");
    }

    #[test]
    fn test_escape_above_root_is_not_found() {
        let table = PatternTable::builtin();
        assert!(table.resolve("album", "../playlist", Style::Directory).is_none());
        assert!(table.resolve("", "..", Style::Directory).is_none());
        // Climbing within the root is fine.
        let m = table
            .resolve("album", "Vacation/../Trip", Style::Directory)
            .unwrap();
        assert_eq!(m.collection(), Some("Trip"));
    }

    #[tokio::test]
    async fn test_root_listing() {
        let table = PatternTable::builtin();
        let m = table.resolve("", "", Style::Directory).unwrap();
        let entries = m.list(&EchoLister).await.unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["album", "playlist"]);
        assert!(entries.iter().all(|e| e.kind.is_dir()));
        assert!(entries.iter().all(|e| e.mtime == SystemTime::UNIX_EPOCH));
    }

    #[tokio::test]
    async fn test_listing_dispatch() {
        let table = PatternTable::builtin();

        let m = table.resolve("", "playlist", Style::Directory).unwrap();
        let entries = m.list(&EchoLister).await.unwrap();
        assert_eq!(entries[0].path, "playlist/playlist-collection");

        let m = table.resolve("album", "Vacation", Style::Directory).unwrap();
        let entries = m.list(&EchoLister).await.unwrap();
        assert_eq!(entries[0].path, "Vacation/album-Vacation.jpg");

        let m = table.resolve("", "album/V/x.jpg", Style::File).unwrap();
        assert!(matches!(
            m.list(&EchoLister).await,
            Err(VfsError::NotADirectory(_))
        ));
    }
}
