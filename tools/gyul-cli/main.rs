use clap::{Parser, Subcommand};
use gyul::canvas::CanvasState;
use gyul::context::ContextFormatter;
use gyul::graph::ancestor_ids;
use gyul::store::{CanvasStore, JsonFileStore};

/// Inspection tool for saved gyul canvases.
#[derive(Parser)]
#[command(name = "gyul-cli", version, about)]
struct Cli {
    /// Path to the saved application state (JSON).
    #[arg(short, long)]
    state: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List canvases with node and edge counts.
    Inspect,
    /// Check every canvas against the graph invariants.
    Validate,
    /// Print the formatted ancestor context of one node.
    Context {
        /// The node whose ancestors should be linearized.
        node_id: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let app = JsonFileStore::new(&cli.state).load()?;

    match cli.command {
        Command::Inspect => {
            println!("{} canvas(es)", app.canvases.len());
            for canvas in &app.canvases {
                let active = if app.active_canvas_id == Some(canvas.id) {
                    " (active)"
                } else {
                    ""
                };
                println!(
                    "  {} '{}'{} - {} node(s), {} edge(s), updated {}",
                    canvas.id,
                    canvas.name,
                    active,
                    canvas.nodes.len(),
                    canvas.edges.len(),
                    canvas.updated_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        Command::Validate => {
            let mut problems = 0usize;
            for canvas in &app.canvases {
                problems += validate_canvas(canvas);
            }
            if problems == 0 {
                println!("ok: all canvases satisfy the graph invariants");
            } else {
                println!("{problems} problem(s) found");
                std::process::exit(1);
            }
        }
        Command::Context { node_id } => {
            let canvas = app
                .canvases
                .iter()
                .find(|c| c.node(&node_id).is_some())
                .ok_or_else(|| format!("node '{node_id}' not found in any canvas"))?;
            let context = ContextFormatter::format_context_for(canvas, &node_id);
            if context.is_empty() {
                println!("(no usable ancestor context)");
            } else {
                println!("{context}");
            }
        }
    }

    Ok(())
}

/// Reports invariant violations on one canvas and returns how many were found.
fn validate_canvas(canvas: &CanvasState) -> usize {
    let mut problems = 0usize;

    for edge in &canvas.edges {
        let source = canvas.node(&edge.source);
        let target = canvas.node(&edge.target);
        match (source, target) {
            (Some(source), Some(target)) => {
                if source.flow_id != target.flow_id {
                    println!(
                        "canvas '{}': edge {} crosses flows {} and {}",
                        canvas.name, edge.id, source.flow_id, target.flow_id
                    );
                    problems += 1;
                }
            }
            _ => {
                println!("canvas '{}': edge {} has a dangling endpoint", canvas.name, edge.id);
                problems += 1;
            }
        }
    }

    for node in &canvas.nodes {
        let parents = canvas.edges.iter().filter(|e| e.target == node.id).count();
        if parents > 1 {
            println!(
                "canvas '{}': node {} has {} parents",
                canvas.name, node.id, parents
            );
            problems += 1;
        }
        if ancestor_ids(&canvas.edges, &node.id).contains(&node.id) {
            println!(
                "canvas '{}': node {} is its own ancestor",
                canvas.name, node.id
            );
            problems += 1;
        }
    }

    problems
}
