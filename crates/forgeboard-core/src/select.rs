// crates/forgeboard-core/src/select.rs
use std::collections::HashSet;
use std::sync::Arc;

use crate::{CatalogIndex, FeatureId};

/// The set of currently-selected feature ids. Membership only; all
/// mutation goes through [`DependencyResolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<FeatureId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureId> {
        self.selected.iter()
    }

    /// Selected ids in sorted order, for deterministic reports.
    pub fn sorted(&self) -> Vec<FeatureId> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    fn insert(&mut self, id: FeatureId) {
        self.selected.insert(id);
    }

    fn remove(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }
}

/// Decides whether a node may be toggled and applies the toggle,
/// including mutual-exclusion eviction and cascading deselection.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    index: Arc<CatalogIndex>,
}

impl DependencyResolver {
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Whether the node's prerequisite rule holds against the selection.
    ///
    /// A node with no `requires_any` is always satisfied. Otherwise the
    /// rule is an OR over the listed ids: a required id with children is
    /// met when any of its direct children is selected, a leaf when it is
    /// selected itself.
    pub fn is_satisfied(&self, id: &str, selection: &SelectionSet) -> bool {
        let node = match self.index.node(id) {
            Some(node) => node,
            None => return false,
        };
        if node.requires_any.is_empty() {
            return true;
        }
        node.requires_any.iter().any(|req| {
            if self.index.has_children(req) {
                self.index
                    .children_ids(req)
                    .iter()
                    .any(|child| selection.contains(child))
            } else {
                selection.contains(req)
            }
        })
    }

    /// Toggle `id`, mutating `selection`. Returns whether anything
    /// changed; toggling an unknown or currently-disabled node is a
    /// no-op.
    pub fn toggle(&self, id: &str, selection: &mut SelectionSet) -> bool {
        if !self.index.contains(id) {
            tracing::warn!(feature = id, "toggle on unknown feature ignored");
            return false;
        }

        if selection.contains(id) {
            self.remove_with_descendants(id, selection);
        } else {
            if !self.is_satisfied(id, selection) {
                tracing::debug!(feature = id, "toggle on disabled feature ignored");
                return false;
            }
            self.evict_exclusive_peers(id, selection);
            selection.insert(id.to_string());
        }

        self.cleanup(selection);
        true
    }

    /// Remove every other selected member of the node's mutual-exclusion
    /// group, cascading through each evictee's descendants.
    fn evict_exclusive_peers(&self, id: &str, selection: &mut SelectionSet) {
        let group = match self.index.node(id).and_then(|n| n.exclusive_group.clone()) {
            Some(group) => group,
            None => return,
        };
        let peers: Vec<FeatureId> = self
            .index
            .ids()
            .iter()
            .filter(|other| {
                other.as_str() != id
                    && selection.contains(other)
                    && self
                        .index
                        .node(other)
                        .map_or(false, |n| n.exclusive_group.as_deref() == Some(&group))
            })
            .cloned()
            .collect();
        for peer in peers {
            tracing::debug!(evicted = %peer, group = %group, "mutual exclusion eviction");
            self.remove_with_descendants(&peer, selection);
        }
    }

    fn remove_with_descendants(&self, id: &str, selection: &mut SelectionSet) {
        selection.remove(id);
        for descendant in self.index.descendant_ids(id) {
            selection.remove(&descendant);
        }
    }

    /// Remove every selected node whose prerequisite no longer holds,
    /// cascading through its descendants. Iterates to a fixed point so
    /// prerequisite chains of any depth settle.
    fn cleanup(&self, selection: &mut SelectionSet) {
        loop {
            let invalidated: Vec<FeatureId> = self
                .index
                .ids()
                .iter()
                .filter(|id| selection.contains(id) && !self.is_satisfied(id, selection))
                .cloned()
                .collect();
            if invalidated.is_empty() {
                break;
            }
            for id in invalidated {
                tracing::debug!(feature = %id, "prerequisite no longer satisfied, removed");
                self.remove_with_descendants(&id, selection);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, FeatureNode};

    /// A reduced rendition of the auth feature catalog: exclusive token
    /// systems, prerequisite chains, and a nested authorization tree.
    fn catalog() -> Catalog {
        let mut authentication = FeatureNode::leaf("authentication", "AUTHENTICATION");
        let mut account_merging = FeatureNode::leaf("account-merging", "Account merging");
        account_merging.requires_any = vec!["social-login".to_string()];
        authentication.children = vec![
            FeatureNode::leaf("email-password-login", "Email/Password login"),
            FeatureNode::leaf("social-login", "Social login"),
            account_merging,
        ];

        let mut token_system = FeatureNode::leaf("token-system", "TOKEN SYSTEM");
        let mut jwt = FeatureNode::leaf("jwt-tokens", "JWT");
        jwt.exclusive_group = Some("token-system".to_string());
        jwt.children = vec![FeatureNode::leaf("token-rotation", "Token rotation")];
        let mut opaque = FeatureNode::leaf("opaque-tokens", "Opaque tokens");
        opaque.exclusive_group = Some("token-system".to_string());
        token_system.children = vec![jwt, opaque];

        let mut audit = FeatureNode::leaf("audit-security", "AUDIT & SECURITY");
        let mut notifications = FeatureNode::leaf("login-notifications", "Login notifications");
        notifications.requires_any = vec!["login-history".to_string()];
        let mut digest = FeatureNode::leaf("notification-digest", "Notification digest");
        digest.requires_any = vec!["login-notifications".to_string()];
        audit.children = vec![
            FeatureNode::leaf("login-history", "Login history"),
            notifications,
            digest,
        ];

        let mut mfa = FeatureNode::leaf("mfa", "MFA");
        let mut backup_codes = FeatureNode::leaf("backup-codes", "Backup codes");
        // "mfa" has children, so this requirement is met by any child of mfa
        backup_codes.requires_any = vec!["totp".to_string()];
        mfa.children = vec![FeatureNode::leaf("totp", "TOTP"), backup_codes];

        Catalog {
            groups: vec![authentication, token_system, audit, mfa],
        }
    }

    fn resolver() -> DependencyResolver {
        DependencyResolver::new(Arc::new(CatalogIndex::build(&catalog())))
    }

    #[test]
    fn toggle_twice_restores_original_set() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        assert!(resolver.toggle("email-password-login", &mut selection));
        let snapshot = selection.clone();

        assert!(resolver.toggle("social-login", &mut selection));
        assert!(resolver.toggle("social-login", &mut selection));
        assert_eq!(selection, snapshot);
    }

    #[test]
    fn deselect_cascades_to_all_descendants() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        resolver.toggle("jwt-tokens", &mut selection);
        resolver.toggle("token-rotation", &mut selection);
        assert!(selection.contains("token-rotation"));

        resolver.toggle("jwt-tokens", &mut selection);
        assert!(!selection.contains("jwt-tokens"));
        assert!(!selection.contains("token-rotation"));
        assert!(selection.is_empty());
    }

    #[test]
    fn mutual_exclusion_keeps_last_selected() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        resolver.toggle("jwt-tokens", &mut selection);
        resolver.toggle("opaque-tokens", &mut selection);

        assert!(selection.contains("opaque-tokens"));
        assert!(!selection.contains("jwt-tokens"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn exclusion_eviction_cascades_descendants() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        resolver.toggle("jwt-tokens", &mut selection);
        resolver.toggle("token-rotation", &mut selection);
        resolver.toggle("opaque-tokens", &mut selection);

        assert_eq!(selection.sorted(), vec!["opaque-tokens"]);
    }

    #[test]
    fn disabled_toggle_is_a_noop() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        // account-merging requires social-login, which is absent
        assert!(!resolver.is_satisfied("account-merging", &selection));
        assert!(!resolver.toggle("account-merging", &mut selection));
        assert!(selection.is_empty());

        resolver.toggle("social-login", &mut selection);
        assert!(resolver.is_satisfied("account-merging", &selection));
        assert!(resolver.toggle("account-merging", &mut selection));
        assert!(selection.contains("account-merging"));
    }

    #[test]
    fn requirement_on_parent_is_met_by_any_child() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        // "totp" is a leaf here, so the requirement is on the node itself
        resolver.toggle("totp", &mut selection);
        assert!(resolver.is_satisfied("backup-codes", &selection));

        // A requirement naming a node WITH children is met by any child
        let mut sel2 = SelectionSet::new();
        resolver.toggle("opaque-tokens", &mut sel2);
        let mut wants_tokens = FeatureNode::leaf("needs-tokens", "Needs tokens");
        wants_tokens.requires_any = vec!["token-system".to_string()];
        let mut extended = catalog();
        extended.groups[0].children.push(wants_tokens);
        let resolver2 = DependencyResolver::new(Arc::new(CatalogIndex::build(&extended)));
        assert!(resolver2.is_satisfied("needs-tokens", &sel2));
    }

    #[test]
    fn cleanup_reaches_fixed_point_on_chains() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        resolver.toggle("login-history", &mut selection);
        resolver.toggle("login-notifications", &mut selection);
        resolver.toggle("notification-digest", &mut selection);
        assert_eq!(selection.len(), 3);

        // Removing the root of the chain must empty the whole chain, even
        // though the digest only becomes unsatisfied after the
        // notifications node falls out.
        resolver.toggle("login-history", &mut selection);
        assert!(selection.is_empty());
    }

    #[test]
    fn prerequisite_invariant_holds_after_any_toggle() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();

        let script = [
            "email-password-login",
            "social-login",
            "account-merging",
            "jwt-tokens",
            "token-rotation",
            "social-login", // deselect: invalidates account-merging
            "opaque-tokens",
            "login-history",
            "login-notifications",
        ];
        for id in script {
            resolver.toggle(id, &mut selection);
            for selected in selection.sorted() {
                assert!(
                    resolver.is_satisfied(&selected, &selection),
                    "{selected} left selected while unsatisfied"
                );
            }
        }
        assert!(!selection.contains("account-merging"));
    }

    #[test]
    fn unknown_feature_is_ignored() {
        let resolver = resolver();
        let mut selection = SelectionSet::new();
        assert!(!resolver.toggle("does-not-exist", &mut selection));
        assert!(selection.is_empty());
    }
}
