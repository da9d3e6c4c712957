//! Unitforge CLI
//!
//! Command-line interface for converting host-editor scene documents into
//! engine unit and mesh files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use unitforge_core::ExportOptions;
use unitforge_export::build_and_serialize;
use unitforge_scene::{build_graph, NodeKind, SceneDocument};

/// Unitforge - scene document to engine unit converter
#[derive(Parser)]
#[command(name = "unitforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene document to a unit file plus per-mesh files
    Export(ExportArgs),

    /// Summarize a scene document without writing anything
    Info(InfoArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Path to the scene document (JSON)
    scene: PathBuf,

    /// Output unit file path
    #[arg(short, long)]
    output: PathBuf,

    /// Export only objects flagged as selected
    #[arg(long)]
    only_selected: bool,

    /// Skip empty (transform-only) objects
    #[arg(long)]
    skip_empties: bool,

    /// Skip mesh objects
    #[arg(long)]
    skip_meshes: bool,

    /// Skip per-vertex normals
    #[arg(long)]
    skip_normals: bool,

    /// Skip per-vertex color layers
    #[arg(long)]
    skip_colors: bool,

    /// Skip per-vertex texture coordinates
    #[arg(long)]
    skip_texcoords: bool,

    /// Skip tangent and bitangent generation
    #[arg(long)]
    skip_tangents: bool,

    /// Maximum bone influences kept per vertex
    #[arg(long, default_value = "4")]
    max_influences: usize,
}

#[derive(Args)]
struct InfoArgs {
    /// Path to the scene document (JSON)
    scene: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Info(args) => cmd_info(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,unitforge={}", level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let document = SceneDocument::from_path(&args.scene)
        .with_context(|| format!("loading scene document {}", args.scene.display()))?;

    let options = ExportOptions {
        only_selected: args.only_selected,
        export_empties: !args.skip_empties,
        export_meshes: !args.skip_meshes,
        export_normals: !args.skip_normals,
        export_colors: !args.skip_colors,
        export_texcoords: !args.skip_texcoords,
        export_tangents: !args.skip_tangents,
        max_bone_influences: args.max_influences,
    };

    build_and_serialize(&document, &options, &args.output)
        .with_context(|| format!("exporting unit {}", args.output.display()))?;

    println!("Exported {}", args.output.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let document = SceneDocument::from_path(&args.scene)
        .with_context(|| format!("loading scene document {}", args.scene.display()))?;

    let graph = build_graph(&document, &ExportOptions::default())
        .context("building scene graph")?;

    println!("{} exportable nodes", graph.len());
    for &index in &graph.serialization_order() {
        let node = graph.node(index);
        match &node.kind {
            NodeKind::Mesh(mesh) => println!(
                "  MESH  {} ({} vertices, {} triangles, {} materials)",
                node.path,
                mesh.vertex_count(),
                mesh.triangle_count(),
                mesh.materials.len()
            ),
            NodeKind::Empty => println!("  EMPTY {}", node.path),
        }
    }
    Ok(())
}
