use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use std::path::Path;

use forgeboard_core::{load_catalog_file, load_schema_file, FeatureNode, ServiceLinks};
use forgeboard_render::{CanvasRenderer, RenderResult, ViewCommand};
use forgeboard_runtime::{Exporter, Project};

#[derive(Parser)]
#[command(name = "forgeboard-inspect")]
#[command(about = "Build a service spec from the command line and inspect the result")]
struct Args {
    /// Path to the feature catalog
    #[arg(long, default_value = "assets/catalog.json")]
    catalog: String,

    /// Path to the column requirement schema
    #[arg(long, default_value = "assets/requirements.json")]
    requirements: String,

    /// Path to the external service link table
    #[arg(long, default_value = "assets/services.json")]
    services: String,

    /// Feature ids to toggle, in order
    #[arg(long = "toggle")]
    toggles: Vec<String>,

    /// Enable the database block with the given engine
    #[arg(long)]
    database: Option<String>,

    /// Enable the cache block with the given engine
    #[arg(long)]
    cache: Option<String>,

    /// Cache key patterns to register
    #[arg(long = "cache-key")]
    cache_keys: Vec<String>,

    /// Column assignments as feature:table:column
    #[arg(long = "map")]
    mappings: Vec<String>,

    /// Print the exported document instead of the inspection views
    #[arg(long)]
    export: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    for path in [&args.catalog, &args.requirements, &args.services] {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
    }

    let catalog = load_catalog_file(&args.catalog)
        .with_context(|| format!("Failed to load catalog: {}", args.catalog))?;
    let schema = load_schema_file(&args.requirements)
        .with_context(|| format!("Failed to load requirements: {}", args.requirements))?;
    let services = std::fs::read_to_string(&args.services)
        .with_context(|| format!("Failed to read services: {}", args.services))?;
    let links = ServiceLinks::from_json(&services).context("Failed to parse services")?;

    let mut project = Project::new(catalog, schema, links);

    if let Some(engine) = &args.database {
        project.toggle_database();
        project.set_database_engine(engine.clone());
    }
    if let Some(engine) = &args.cache {
        project.toggle_cache();
        project.set_cache_engine(engine.clone());
    }
    for key in &args.cache_keys {
        project.add_cache_key(key.clone());
    }

    for id in &args.toggles {
        if !project.toggle_feature(id) {
            eprintln!("Toggle ignored (unknown or disabled): {id}");
        }
    }

    for spec in &args.mappings {
        let (feature, table, column) = parse_mapping(spec)
            .with_context(|| format!("Invalid --map value: {spec} (want feature:table:column)"))?;
        project.toggle_column(feature, table, column);
    }

    if args.export {
        let mut exporter = JsonExporter;
        print!("{}", exporter.export(&project)?);
        return Ok(());
    }

    println!("FEATURES:");
    print!("{}", render_feature_tree(&project));

    println!("\nCANVAS:");
    let mut canvas = TextCanvas::default();
    canvas.begin_frame(Vec2::new(1400.0, 700.0))?;
    canvas.execute_commands(&project.view_commands())?;
    print!("{}", canvas.end_frame()?);

    println!("\nVALIDATION:");
    let report = project.validate();
    if report.valid() {
        println!("  ok");
    } else {
        for line in report.messages() {
            println!("  {line}");
        }
    }

    Ok(())
}

fn parse_mapping(spec: &str) -> Option<(&str, &str, &str)> {
    let mut parts = spec.splitn(3, ':');
    Some((parts.next()?, parts.next()?, parts.next()?))
}

fn render_feature_tree(project: &Project) -> String {
    let mut output = String::new();
    for group in &project.catalog().groups {
        render_node(&mut output, project, group, 0, true);
    }
    output
}

fn render_node(output: &mut String, project: &Project, node: &FeatureNode, depth: usize, is_last: bool) {
    let tree_char = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let indent = if depth == 0 {
        String::new()
    } else {
        "│   ".repeat(depth - 1) + tree_char
    };

    let marker = if project.is_feature_selected(&node.id) {
        "[x]"
    } else if project.is_feature_enabled(&node.id) {
        "[ ]"
    } else {
        "[-]"
    };
    output.push_str(&format!("{indent}{marker} {}", node.name));
    if let Some(note) = &node.note {
        output.push_str(&format!(" ({note})"));
    }
    output.push('\n');

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(output, project, child, depth + 1, i == child_count - 1);
    }
}

/// Plain-text canvas backend, enough to see the layout the engine chose.
#[derive(Default)]
struct TextCanvas {
    lines: Vec<String>,
}

impl CanvasRenderer for TextCanvas {
    type Output = String;

    fn begin_frame(&mut self, _viewport: Vec2) -> RenderResult<()> {
        self.lines.clear();
        Ok(())
    }

    fn execute_commands(&mut self, commands: &[ViewCommand]) -> RenderResult<()> {
        for command in commands {
            match command {
                ViewCommand::DrawWidget { id, title, position, size, .. } => {
                    self.lines.push(format!(
                        "  {id} \"{title}\" at ({:.0},{:.0}) size ({:.0}x{:.0})",
                        position.x, position.y, size.x, size.y
                    ));
                }
                ViewCommand::DrawLink { from, to } => {
                    self.lines.push(format!("  {from} -> {to}"));
                }
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> RenderResult<String> {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Reference exporter: the document schema lives here, outside the core.
struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&mut self, project: &Project) -> Result<String> {
        let meta = project.meta();
        let widgets: serde_json::Map<String, serde_json::Value> = project
            .view_commands()
            .iter()
            .filter_map(|command| match command {
                ViewCommand::DrawWidget { id, position, size, .. } => Some((
                    id.to_string(),
                    serde_json::json!({
                        "x": position.x,
                        "y": position.y,
                        "width": size.x,
                        "height": size.y,
                    }),
                )),
                ViewCommand::DrawLink { .. } => None,
            })
            .collect();

        let document = serde_json::json!({
            "serviceType": meta.service_type,
            "group": meta.group,
            "artifact": meta.artifact,
            "name": meta.name,
            "description": meta.description,
            "packageName": meta.package_name,
            "model": project.model(),
            "build": project.build(),
            "database": {
                "enabled": project.database().enabled,
                "engine": project.database().engine,
                "tables": project.database().tables,
            },
            "cache": {
                "enabled": project.cache().enabled,
                "engine": project.cache().engine,
                "keys": project.cache().keys,
            },
            "features": project.selected_features(),
            "services": project.required_services(),
            "columnMappings": project.mappings(),
            "widgets": widgets,
            "valid": project.validate().valid(),
        });

        Ok(serde_json::to_string_pretty(&document)?)
    }
}
