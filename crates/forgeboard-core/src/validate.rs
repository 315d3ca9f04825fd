// crates/forgeboard-core/src/validate.rs
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{FeatureId, RequirementSchema, SelectionSet};

/// Columns the user assigned to a feature: table name -> column names, in
/// assignment order. BTreeMap keeps table iteration deterministic.
pub type ColumnAssignment = BTreeMap<String, Vec<String>>;

/// All per-feature assignments the host state carries.
pub type ColumnMappings = HashMap<FeatureId, ColumnAssignment>;

/// Outcome of a validation run. Errors are data, never panics; `valid`
/// holds iff the error map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<FeatureId, Vec<String>>,
}

impl ValidationReport {
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    fn push(&mut self, feature: &str, message: String) {
        self.errors.entry(feature.to_string()).or_default().push(message);
    }

    /// Flat, display-ready rendering of the error map.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (feature, errors) in &self.errors {
            out.push(format!("Feature '{feature}':"));
            for error in errors {
                out.push(format!("  - {error}"));
            }
        }
        out
    }
}

/// Check every selected, mapping-eligible feature's column assignment
/// against the requirement schema.
///
/// Pure and side-effect-free; re-run on demand (typically right before
/// export), not incrementally maintained.
pub fn validate_column_mappings(
    selection: &SelectionSet,
    mappings: &ColumnMappings,
    schema: &RequirementSchema,
    cache_keys: &[String],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for feature in selection.sorted() {
        let requirement = match schema.get(&feature) {
            Some(req) if req.expandable => req,
            _ => continue,
        };

        if let Some(db) = &requirement.database {
            let empty = ColumnAssignment::new();
            let assignment = mappings.get(&feature).unwrap_or(&empty);

            check_duplicates(&feature, assignment, &mut report);

            for table in &db.tables {
                let spec = match db.columns.get(table) {
                    Some(spec) => spec,
                    None => continue,
                };
                let assigned = assignment.get(table).map(Vec::as_slice).unwrap_or(&[]);

                for column in &spec.required {
                    if !assigned.contains(column) {
                        report.push(&feature, format!("Missing required column: {table}.{column}"));
                    }
                }
                for column in assigned {
                    if !spec.required.contains(column) && !spec.optional.contains(column) {
                        report.push(&feature, format!("Unknown column selected: {table}.{column}"));
                    }
                }
            }
        }

        if let Some(cache) = &requirement.cache {
            for pattern in &cache.required {
                if !cache_keys.iter().any(|key| key == pattern) {
                    report.push(&feature, format!("Missing required cache key: {pattern}"));
                }
            }
        }
    }

    tracing::debug!(errors = report.error_count(), "column mapping validation");
    report
}

/// No `(table, column)` pair may be assigned twice within one feature.
fn check_duplicates(feature: &str, assignment: &ColumnAssignment, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (table, columns) in assignment {
        for column in columns {
            let qualified = format!("{table}.{column}");
            if !seen.insert(qualified.clone()) {
                report.push(feature, format!("Duplicate column: {qualified}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, CatalogIndex, DependencyResolver, FeatureNode, RequirementSchema};
    use std::sync::Arc;

    fn schema() -> RequirementSchema {
        RequirementSchema::from_json(
            r#"{
                "email-password-login": {
                    "expandable": true,
                    "database": {
                        "tables": ["users"],
                        "columns": {
                            "users": {
                                "required": ["email", "password_hash"],
                                "optional": ["salt", "last_login_at"]
                            }
                        }
                    }
                },
                "compromised-password-check": {
                    "expandable": true,
                    "cache": { "required": ["blacklist:password:{hash}"] }
                },
                "basic-auth-support": { "expandable": false }
            }"#,
        )
        .unwrap()
    }

    fn selection_of(ids: &[&str]) -> SelectionSet {
        let mut auth = FeatureNode::leaf("authentication", "AUTH");
        auth.children = vec![
            FeatureNode::leaf("email-password-login", "Email/Password login"),
            FeatureNode::leaf("compromised-password-check", "Compromised password check"),
            FeatureNode::leaf("basic-auth-support", "Basic Auth"),
        ];
        let catalog = Catalog { groups: vec![auth] };
        let resolver = DependencyResolver::new(Arc::new(CatalogIndex::build(&catalog)));
        let mut selection = SelectionSet::new();
        for id in ids {
            assert!(resolver.toggle(id, &mut selection));
        }
        selection
    }

    fn assignment(pairs: &[(&str, &[&str])]) -> ColumnAssignment {
        pairs
            .iter()
            .map(|(table, cols)| {
                (table.to_string(), cols.iter().map(|c| c.to_string()).collect())
            })
            .collect()
    }

    #[test]
    fn complete_mapping_is_valid() {
        let selection = selection_of(&["email-password-login"]);
        let mappings = ColumnMappings::from([(
            "email-password-login".to_string(),
            assignment(&[("users", &["email", "password_hash", "salt"])]),
        )]);

        let report = validate_column_mappings(&selection, &mappings, &schema(), &[]);
        assert!(report.valid());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn missing_required_columns_are_reported() {
        let selection = selection_of(&["email-password-login"]);
        let mappings = ColumnMappings::from([(
            "email-password-login".to_string(),
            assignment(&[("users", &["email"])]),
        )]);

        let report = validate_column_mappings(&selection, &mappings, &schema(), &[]);
        assert!(!report.valid());
        assert_eq!(
            report.errors["email-password-login"],
            vec!["Missing required column: users.password_hash"]
        );
    }

    #[test]
    fn empty_mapping_reports_every_required_column() {
        let selection = selection_of(&["email-password-login"]);
        let report = validate_column_mappings(&selection, &ColumnMappings::new(), &schema(), &[]);
        assert_eq!(report.errors["email-password-login"].len(), 2);
    }

    #[test]
    fn unknown_columns_are_reported() {
        let selection = selection_of(&["email-password-login"]);
        let mappings = ColumnMappings::from([(
            "email-password-login".to_string(),
            assignment(&[("users", &["email", "password_hash", "favorite_color"])]),
        )]);

        let report = validate_column_mappings(&selection, &mappings, &schema(), &[]);
        assert_eq!(
            report.errors["email-password-login"],
            vec!["Unknown column selected: users.favorite_color"]
        );
    }

    #[test]
    fn duplicate_assignments_are_reported_once_per_repeat() {
        let selection = selection_of(&["email-password-login"]);
        let mappings = ColumnMappings::from([(
            "email-password-login".to_string(),
            assignment(&[("users", &["email", "password_hash", "email"])]),
        )]);

        let report = validate_column_mappings(&selection, &mappings, &schema(), &[]);
        assert_eq!(
            report.errors["email-password-login"],
            vec!["Duplicate column: users.email"]
        );
    }

    #[test]
    fn cache_key_requirements_check_the_key_list() {
        let selection = selection_of(&["compromised-password-check"]);

        let report =
            validate_column_mappings(&selection, &ColumnMappings::new(), &schema(), &[]);
        assert_eq!(
            report.errors["compromised-password-check"],
            vec!["Missing required cache key: blacklist:password:{hash}"]
        );

        let keys = vec!["blacklist:password:{hash}".to_string()];
        let report =
            validate_column_mappings(&selection, &ColumnMappings::new(), &schema(), &keys);
        assert!(report.valid());
    }

    #[test]
    fn non_expandable_and_unselected_features_are_skipped() {
        // basic-auth-support has a schema entry but is not expandable;
        // email-password-login has requirements but is not selected.
        let selection = selection_of(&["basic-auth-support"]);
        let report = validate_column_mappings(&selection, &ColumnMappings::new(), &schema(), &[]);
        assert!(report.valid());
    }
}
