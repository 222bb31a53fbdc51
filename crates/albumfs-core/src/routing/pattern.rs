//! The pattern table: the fixed layout of the virtual filesystem.
//!
//! Each rule binds an anchored regular expression to a structural [`Role`].
//! Everything a caller may do at a path (list it, upload into it, create or
//! remove it) follows from the role of the rule that matched, so no rule can
//! carry an inconsistent combination of capabilities.

use regex::Regex;
use thiserror::Error;

use super::kind::CollectionKind;

/// Structural role of a virtual path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Filesystem root (`""`).
    Root,
    /// Top-level directory of one collection kind (`album`).
    KindRoot,
    /// A named collection (`album/<name>`).
    Collection,
    /// A photo inside a collection (`album/<name>/<item>`).
    Item,
}

impl Role {
    /// Only items are files; everything else is a directory.
    pub fn applies_to_files(&self) -> bool {
        matches!(self, Role::Item)
    }

    /// Lookup style this role answers to.
    pub fn style(&self) -> Style {
        Style::from_is_file(self.applies_to_files())
    }

    /// Uploads are legal only at an item position.
    pub fn can_upload(&self) -> bool {
        matches!(self, Role::Item)
    }

    /// mkdir/rmdir are legal only at a collection position.
    pub fn can_create_collection(&self) -> bool {
        matches!(self, Role::Collection)
    }

    /// Whether a directory listing exists at this position.
    pub fn is_listable(&self) -> bool {
        !matches!(self, Role::Item)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::KindRoot => "kind-root",
            Role::Collection => "collection",
            Role::Item => "item",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a lookup wants a file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    File,
    Directory,
}

impl Style {
    pub fn from_is_file(is_file: bool) -> Self {
        if is_file { Style::File } else { Style::Directory }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Style::File)
    }
}

/// Routing errors.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A rule's pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule's role and collection kind disagree.
    #[error("rule {pattern:?}: role {role} {reason}")]
    InvalidRule {
        pattern: String,
        role: Role,
        reason: &'static str,
    },
}

/// Uncompiled rule description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSpec {
    pub pattern: String,
    pub role: Role,
    pub kind: Option<CollectionKind>,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, role: Role, kind: Option<CollectionKind>) -> Self {
        Self {
            pattern: pattern.into(),
            role,
            kind,
        }
    }

    /// The rules for one collection kind, in the order they must be tried.
    fn for_kind(kind: CollectionKind) -> [RuleSpec; 3] {
        let seg = kind.as_str();
        [
            RuleSpec::new(format!("^{seg}$"), Role::KindRoot, Some(kind)),
            RuleSpec::new(format!("^{seg}/([^/]+)$"), Role::Collection, Some(kind)),
            RuleSpec::new(format!("^{seg}/([^/]+)/([^/]+)$"), Role::Item, Some(kind)),
        ]
    }
}

/// A compiled rule.
#[derive(Clone, Debug)]
pub struct Rule {
    pattern: String,
    matcher: Regex,
    role: Role,
    kind: Option<CollectionKind>,
}

impl Rule {
    fn compile(spec: RuleSpec) -> Result<Self, RoutingError> {
        match (spec.role, spec.kind) {
            (Role::Root, Some(_)) => {
                return Err(RoutingError::InvalidRule {
                    pattern: spec.pattern,
                    role: spec.role,
                    reason: "must not name a collection kind",
                });
            }
            (Role::KindRoot | Role::Collection | Role::Item, None) => {
                return Err(RoutingError::InvalidRule {
                    pattern: spec.pattern,
                    role: spec.role,
                    reason: "requires a collection kind",
                });
            }
            _ => {}
        }
        if !(spec.pattern.starts_with('^') && spec.pattern.ends_with('$')) {
            return Err(RoutingError::InvalidRule {
                pattern: spec.pattern,
                role: spec.role,
                reason: "pattern must be anchored with ^ and $",
            });
        }

        let matcher = Regex::new(&spec.pattern).map_err(|source| RoutingError::InvalidPattern {
            pattern: spec.pattern.clone(),
            source,
        })?;

        Ok(Self {
            pattern: spec.pattern,
            matcher,
            role: spec.role,
            kind: spec.kind,
        })
    }

    /// Pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// `None` only for the root rule.
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        self.kind
    }

    pub fn applies_to_files(&self) -> bool {
        self.role.applies_to_files()
    }

    pub fn style(&self) -> Style {
        self.role.style()
    }

    pub fn can_upload(&self) -> bool {
        self.role.can_upload()
    }

    pub fn can_create_collection(&self) -> bool {
        self.role.can_create_collection()
    }

    /// Whether resolving to this rule can produce directory entries.
    pub fn produces_entries(&self) -> bool {
        self.role.is_listable()
    }

    pub(crate) fn captures(&self, path: &str) -> Option<Vec<String>> {
        self.matcher.captures(path).map(|caps| {
            caps.iter()
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
    }
}

/// Ordered, immutable list of rules.
///
/// Built once at startup and shared by reference; lookups never mutate it.
#[derive(Clone, Debug)]
pub struct PatternTable {
    rules: Vec<Rule>,
}

impl PatternTable {
    /// Compile a table from rule specs, keeping their order.
    pub fn compile(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, RoutingError> {
        let rules = specs
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rule specs for the built-in layout.
    ///
    /// No trailing `/` on any path.
    pub fn builtin_specs() -> Vec<RuleSpec> {
        let mut specs = vec![RuleSpec::new("^$", Role::Root, None)];
        for kind in CollectionKind::ALL {
            specs.extend(RuleSpec::for_kind(kind));
        }
        specs
    }

    /// The built-in layout.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile, which can only follow
    /// from an edit to [`builtin_specs`](Self::builtin_specs).
    pub fn builtin() -> Self {
        match Self::compile(Self::builtin_specs()) {
            Ok(table) => table,
            Err(e) => panic!("built-in path patterns are invalid: {e}"),
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}
