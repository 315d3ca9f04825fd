// crates/forgeboard-runtime/src/lib.rs

use std::collections::HashMap;
use std::sync::Arc;

use forgeboard_core::{
    Catalog, CatalogIndex, ColumnMappings, DependencyResolver, FeatureId, RequirementSchema,
    SelectionSet, ServiceLinks, ValidationReport, Widget, WidgetId, validate_column_mappings,
};
use forgeboard_layout::{default_size, screen_to_canvas, CanvasLayout, WidgetBox, ZoomConfig};
use forgeboard_render::ViewCommand;
use glam::Vec2;

pub mod drag;
pub mod export;

pub use drag::*;
pub use export::*;

/// Project metadata with auto-fill: artifact feeds name and package name
/// until the user edits those by hand.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub service_type: String,
    pub group: String,
    pub artifact: String,
    pub name: String,
    pub description: String,
    pub package_name: String,
    name_edited: bool,
    package_edited: bool,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            service_type: "auth".to_string(),
            group: String::new(),
            artifact: String::new(),
            name: String::new(),
            description: String::new(),
            package_name: String::new(),
            name_edited: false,
            package_edited: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseBlock {
    pub enabled: bool,
    pub engine: Option<String>,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CacheBlock {
    pub enabled: bool,
    pub engine: Option<String>,
    pub keys: Vec<String>,
}

/// The application state container.
///
/// Owns every piece of mutable designer state and sequences the three
/// core engines: selection changes run the dependency resolver, widget
/// sync runs the layout engine, and validation reads the settled state.
/// The presentation layer treats everything it reads here as a snapshot
/// and writes only through these methods.
pub struct Project {
    catalog: Catalog,
    index: Arc<CatalogIndex>,
    resolver: DependencyResolver,
    schema: RequirementSchema,
    service_links: ServiceLinks,

    meta: ProjectMeta,
    model: Option<String>,
    build: Option<String>,

    database: DatabaseBlock,
    cache: CacheBlock,

    selection: SelectionSet,
    mappings: ColumnMappings,

    widgets: HashMap<WidgetId, Widget>,
    layout: CanvasLayout,
    zoom_config: ZoomConfig,
    zoom: f32,
    pan: Vec2,
    drag: DragController,
}

impl Project {
    pub fn new(catalog: Catalog, schema: RequirementSchema, service_links: ServiceLinks) -> Self {
        let index = Arc::new(CatalogIndex::build(&catalog));
        let resolver = DependencyResolver::new(index.clone());
        let zoom_config = ZoomConfig::default();
        Self {
            catalog,
            index,
            resolver,
            schema,
            service_links,
            meta: ProjectMeta::default(),
            model: None,
            build: None,
            database: DatabaseBlock::default(),
            cache: CacheBlock::default(),
            selection: SelectionSet::new(),
            mappings: ColumnMappings::new(),
            widgets: HashMap::new(),
            layout: CanvasLayout::default(),
            zoom_config,
            zoom: zoom_config.default,
            pan: Vec2::ZERO,
            drag: DragController::new(),
        }
    }

    pub fn with_layout(mut self, layout: CanvasLayout) -> Self {
        self.layout = layout;
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn schema(&self) -> &RequirementSchema {
        &self.schema
    }

    pub fn meta(&self) -> &ProjectMeta {
        &self.meta
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn database(&self) -> &DatabaseBlock {
        &self.database
    }

    pub fn cache(&self) -> &CacheBlock {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_features(&self) -> Vec<FeatureId> {
        self.selection.sorted()
    }

    pub fn mappings(&self) -> &ColumnMappings {
        &self.mappings
    }

    pub fn widgets(&self) -> &HashMap<WidgetId, Widget> {
        &self.widgets
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// External services implied by the current selection, deduplicated.
    pub fn required_services(&self) -> Vec<String> {
        let selected = self.selection.sorted();
        self.service_links.required_services(&selected)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn set_group(&mut self, group: impl Into<String>) {
        self.meta.group = group.into();
        if !self.meta.package_edited {
            let artifact = if self.meta.artifact.is_empty() {
                "demo"
            } else {
                self.meta.artifact.as_str()
            };
            self.meta.package_name = if self.meta.group.is_empty() {
                String::new()
            } else {
                format!("{}.{artifact}", self.meta.group)
            };
        }
    }

    pub fn set_artifact(&mut self, artifact: impl Into<String>) {
        self.meta.artifact = artifact.into();
        if !self.meta.name_edited {
            self.meta.name = self.meta.artifact.clone();
        }
        if !self.meta.package_edited {
            let group = if self.meta.group.is_empty() {
                "com.example"
            } else {
                self.meta.group.as_str()
            };
            self.meta.package_name = if self.meta.artifact.is_empty() {
                String::new()
            } else {
                format!("{group}.{}", self.meta.artifact)
            };
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
        self.meta.name_edited = true;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.meta.description = description.into();
    }

    pub fn set_package_name(&mut self, package_name: impl Into<String>) {
        self.meta.package_name = package_name.into();
        self.meta.package_edited = true;
    }

    /// Changing the service type is a hard reset: feature applicability
    /// is type-specific, so all designer state is discarded.
    pub fn set_service_type(&mut self, service_type: impl Into<String>) {
        self.meta = ProjectMeta {
            service_type: service_type.into(),
            ..ProjectMeta::default()
        };
        self.model = None;
        self.build = None;
        self.database = DatabaseBlock::default();
        self.cache = CacheBlock::default();
        self.selection.clear();
        self.mappings.clear();
        self.widgets.clear();
        self.pan = Vec2::ZERO;
        self.drag.cancel();
        tracing::info!(service_type = %self.meta.service_type, "service type changed, state reset");
    }

    /// Changing the model clears the selection: features are
    /// model-specific.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = Some(model.into());
        self.selection.clear();
        self.sync_widgets();
    }

    pub fn set_build(&mut self, build: impl Into<String>) {
        self.build = Some(build.into());
    }

    // ------------------------------------------------------------------
    // Infrastructure blocks
    // ------------------------------------------------------------------

    pub fn toggle_database(&mut self) {
        if self.database.enabled {
            self.database = DatabaseBlock::default();
        } else {
            self.database.enabled = true;
        }
        self.sync_widgets();
    }

    pub fn set_database_engine(&mut self, engine: impl Into<String>) {
        self.database.engine = Some(engine.into());
        self.database.tables.clear();
    }

    pub fn add_table(&mut self, name: impl Into<String>) {
        self.database.tables.push(name.into());
    }

    pub fn set_table_name(&mut self, table: usize, name: impl Into<String>) {
        if let Some(entry) = self.database.tables.get_mut(table) {
            *entry = name.into();
        }
    }

    pub fn remove_table(&mut self, table: usize) {
        if table < self.database.tables.len() {
            self.database.tables.remove(table);
        }
    }

    pub fn toggle_cache(&mut self) {
        if self.cache.enabled {
            self.cache = CacheBlock::default();
        } else {
            self.cache.enabled = true;
        }
        self.sync_widgets();
    }

    pub fn set_cache_engine(&mut self, engine: impl Into<String>) {
        self.cache.engine = Some(engine.into());
        self.cache.keys.clear();
    }

    pub fn add_cache_key(&mut self, pattern: impl Into<String>) {
        self.cache.keys.push(pattern.into());
    }

    pub fn remove_cache_key(&mut self, key: usize) {
        if key < self.cache.keys.len() {
            self.cache.keys.remove(key);
        }
    }

    // ------------------------------------------------------------------
    // Feature selection
    // ------------------------------------------------------------------

    pub fn is_feature_enabled(&self, id: &str) -> bool {
        self.resolver.is_satisfied(id, &self.selection)
    }

    pub fn is_feature_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Toggle a feature through the dependency resolver, then bring the
    /// widget collection in line with the new selection.
    pub fn toggle_feature(&mut self, id: &str) -> bool {
        let changed = self.resolver.toggle(id, &mut self.selection);
        if changed {
            self.sync_widgets();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------

    /// The widgets the current state calls for: infrastructure blocks,
    /// one block per selected mapping-eligible feature, one per linked
    /// external service.
    fn desired_widgets(&self) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if self.database.enabled {
            out.push(WidgetId::Database);
        }
        if self.cache.enabled {
            out.push(WidgetId::Cache);
        }
        for feature in self.selection.sorted() {
            if self.schema.get(&feature).map_or(false, |req| req.expandable) {
                out.push(WidgetId::Feature(feature));
            }
        }
        for service in self.required_services() {
            out.push(WidgetId::Service(service));
        }
        out
    }

    /// Create missing widgets at free positions and drop widgets whose
    /// owning state went false. Surviving widgets keep their positions.
    fn sync_widgets(&mut self) {
        let desired = self.desired_widgets();
        self.widgets.retain(|id, _| desired.contains(id));

        for id in desired {
            if self.widgets.contains_key(&id) {
                continue;
            }
            let size = default_size(id.kind());
            let boxes: Vec<WidgetBox> = self.widgets.values().map(WidgetBox::from).collect();
            let position = self.layout.find_free_position(&boxes, size);
            tracing::debug!(widget = %id, x = position.x, y = position.y, "widget placed");
            self.widgets.insert(id.clone(), Widget::new(id, position, size));
        }
    }

    /// Explicit repositioning outside a drag gesture.
    pub fn set_widget_position(&mut self, id: &WidgetId, position: Vec2) -> bool {
        match self.widgets.get_mut(id) {
            Some(widget) => {
                widget.position = position;
                true
            }
            None => false,
        }
    }

    fn boxes_excluding(&self, exclude: Option<&WidgetId>) -> Vec<WidgetBox> {
        self.widgets
            .iter()
            .filter(|&(id, _)| Some(id) != exclude)
            .map(|(_, widget)| WidgetBox::from(widget))
            .collect()
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Pointer-down on a widget header. Pointer coordinates are screen
    /// space; they are converted through the current pan/zoom before any
    /// geometry runs.
    pub fn begin_drag(&mut self, id: &WidgetId, pointer_screen: Vec2) -> bool {
        let pointer = screen_to_canvas(pointer_screen, self.pan, self.zoom);
        match self.widgets.get(id) {
            Some(widget) => self
                .drag
                .begin(id.clone(), pointer, widget.position, widget.size),
            None => false,
        }
    }

    /// Pointer movement during a drag: returns the live, snapped position
    /// for visual feedback without committing it.
    pub fn update_drag(&mut self, pointer_screen: Vec2) -> Option<Vec2> {
        let active = self.drag.active_widget().cloned()?;
        let pointer = screen_to_canvas(pointer_screen, self.pan, self.zoom);
        let others = self.boxes_excluding(Some(&active));
        self.drag.update(pointer, &self.layout, &others)
    }

    /// Pointer release: resolve overlap and commit the final position
    /// into the widget record.
    pub fn end_drag(&mut self) -> Option<Vec2> {
        let active = self.drag.active_widget().cloned()?;
        let others = self.boxes_excluding(Some(&active));
        let (id, position) = self.drag.end(&self.layout, &others)?;
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.position = position;
        }
        Some(position)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.zoom_config.clamp(zoom);
    }

    pub fn zoom_by_wheel(&mut self, delta: f32) {
        self.zoom = self.zoom_config.from_wheel_delta(self.zoom, delta);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    // ------------------------------------------------------------------
    // Column mappings
    // ------------------------------------------------------------------

    pub fn toggle_column(&mut self, feature: &str, table: &str, column: &str) {
        let assignment = self.mappings.entry(feature.to_string()).or_default();
        let columns = assignment.entry(table.to_string()).or_default();
        if let Some(at) = columns.iter().position(|c| c == column) {
            columns.remove(at);
        } else {
            columns.push(column.to_string());
        }
    }

    pub fn set_mapping(&mut self, feature: &str, table: &str, columns: Vec<String>) {
        self.mappings
            .entry(feature.to_string())
            .or_default()
            .insert(table.to_string(), columns);
    }

    pub fn clear_mapping(&mut self, feature: &str) {
        self.mappings.remove(feature);
    }

    // ------------------------------------------------------------------
    // Validation & presentation
    // ------------------------------------------------------------------

    /// Check the column mappings of every selected, mapping-eligible
    /// feature. Pure over the settled state; typically run right before
    /// export.
    pub fn validate(&self) -> ValidationReport {
        validate_column_mappings(&self.selection, &self.mappings, &self.schema, &self.cache.keys)
    }

    fn widget_title(&self, id: &WidgetId) -> String {
        match id {
            WidgetId::Database => self
                .database
                .engine
                .clone()
                .unwrap_or_else(|| "Database".to_string()),
            WidgetId::Cache => self.cache.engine.clone().unwrap_or_else(|| "Cache".to_string()),
            WidgetId::Feature(feature) => self
                .index
                .node(feature)
                .map(|node| node.name.clone())
                .unwrap_or_else(|| feature.clone()),
            WidgetId::Service(service) => self
                .service_links
                .services
                .get(service)
                .map(|info| info.name.clone())
                .unwrap_or_else(|| service.clone()),
        }
    }

    /// Drawing commands for the presentation layer, in stable order:
    /// widget frames first, then feature-to-service links.
    pub fn view_commands(&self) -> Vec<ViewCommand> {
        let mut ids: Vec<&WidgetId> = self.widgets.keys().collect();
        ids.sort_by_key(|id| id.to_string());

        let mut commands = Vec::new();
        for id in &ids {
            let widget = &self.widgets[*id];
            commands.push(ViewCommand::DrawWidget {
                id: (*id).clone(),
                kind: id.kind(),
                title: self.widget_title(id),
                position: widget.position,
                size: widget.size,
            });
        }
        for id in &ids {
            if let WidgetId::Feature(feature) = id {
                let Some(linked) = self.service_links.links.get(feature) else {
                    continue;
                };
                for service in linked {
                    let target = WidgetId::Service(service.clone());
                    if self.widgets.contains_key(&target) {
                        commands.push(ViewCommand::DrawLink {
                            from: (*id).clone(),
                            to: target,
                        });
                    }
                }
            }
        }
        commands
    }
}
