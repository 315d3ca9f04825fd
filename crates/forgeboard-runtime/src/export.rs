// crates/forgeboard-runtime/src/export.rs
use crate::Project;

/// Seam to the out-of-scope export layer.
///
/// The exporter serializes the validated project state into whatever
/// document format downstream consumers expect; the document schema is
/// deliberately not part of the core. Callers are expected to run
/// [`Project::validate`] first and decide how to surface failures.
pub trait Exporter {
    fn export(&mut self, project: &Project) -> anyhow::Result<String>;
}
