//! Account path resolution.
//!
//! Reports name accounts by colon-separated paths below the book's Root
//! Account (`Assets:Current Assets:Checking`). Each path is resolved to the
//! chain of account ids that leads to it. Resolution walks the tree one segment
//! at a time, matching names exactly against the direct children of the current
//! account in document order; the first match wins.

use gnucash_report_core::{LedgerIndex, ACCOUNT_PATH_SEPARATOR};

use crate::error::EngineError;

/// A resolved account path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPath {
    path: String,
    /// Account ids from the Root Account down to the named account.
    ids: Vec<String>,
}

impl AccountPath {
    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Account ids from the Root Account (element 0) to the leaf.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Id of the account the path names.
    pub fn leaf(&self) -> &str {
        self.ids.last().map_or("", String::as_str)
    }

    /// Distance of the named account from the Root Account.
    ///
    /// This is the number of segments in the path.
    pub fn depth(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }
}

/// A batch of account paths resolved against one ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPaths {
    entries: Vec<(String, Option<AccountPath>)>,
    verified: bool,
}

impl AccountPaths {
    /// Resolve every path in `paths`, keeping input order.
    ///
    /// A path that fails to resolve is logged and recorded as `None`; it does
    /// not stop resolution of the others.
    pub fn resolve<S: AsRef<str>>(index: &LedgerIndex<'_>, paths: &[S]) -> Self {
        let entries: Vec<_> = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_string(), resolve_one(index, path))
            })
            .collect();
        let verified = entries.iter().all(|(_, resolved)| resolved.is_some());

        Self { entries, verified }
    }

    /// Whether every path resolved.
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Number of paths in the batch, resolved or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The resolution of the `i`-th input path.
    pub fn get(&self, i: usize) -> Option<&AccountPath> {
        self.entries.get(i).and_then(|(_, resolved)| resolved.as_ref())
    }

    /// Every input path with its resolution, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AccountPath>)> {
        self.entries
            .iter()
            .map(|(path, resolved)| (path.as_str(), resolved.as_ref()))
    }

    /// Resolved paths only, in input order.
    pub fn resolved(&self) -> impl Iterator<Item = &AccountPath> {
        self.entries.iter().filter_map(|(_, resolved)| resolved.as_ref())
    }

    /// Input paths that did not resolve, in input order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, resolved)| resolved.is_none())
            .map(|(path, _)| path.as_str())
    }

    /// Fail with [`EngineError::UnresolvedPaths`] unless every path resolved.
    pub fn require_verified(self) -> Result<Self, EngineError> {
        if self.verified {
            Ok(self)
        } else {
            Err(EngineError::UnresolvedPaths(
                self.unresolved().map(str::to_string).collect(),
            ))
        }
    }
}

fn resolve_one(index: &LedgerIndex<'_>, path: &str) -> Option<AccountPath> {
    let Some(root) = index.root() else {
        tracing::warn!(path, "ledger has no Root Account; cannot resolve path");
        return None;
    };

    let mut ids = vec![root.id.clone()];
    let mut current = root;
    for segment in path.split(ACCOUNT_PATH_SEPARATOR) {
        let Some(child) = index
            .children(&current.id)
            .iter()
            .find(|child| child.name == segment)
            .copied()
        else {
            tracing::warn!(path, segment, "account path not found in ledger");
            return None;
        };
        ids.push(child.id.clone());
        current = child;
    }

    Some(AccountPath {
        path: path.to_string(),
        ids,
    })
}
