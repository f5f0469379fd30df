use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dsi_progress_logger::prelude::*;
use std::path::PathBuf;
use webgraph::prelude::BvGraph;
use webgraph_dagpart::graph::io::read_pairs;
use webgraph_dagpart::prelude::*;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// A BV graph (`BASENAME.graph`, `BASENAME.properties`, ...).
    Bv,
    /// A text file of tab-separated arcs named `BASENAME`.
    Arcs,
}

/// Extracts the giant strongly connected component around a pivot, splits
/// the rest of the graph into the zones preceding and following it, and
/// partitions the giant component into blocks with contiguous ids.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The basename of the graph; artifacts are written next to it.
    basename: PathBuf,

    /// The format of the input graph.
    #[arg(short, long, value_enum, default_value_t = Format::Bv)]
    format: Format,

    /// The pivot node (default: the node maximizing indegree × outdegree).
    #[arg(short, long)]
    pivot: Option<usize>,

    /// Round budget of each label-propagation pass.
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,

    /// Number of partitions, including the nonempty zones preceding and
    /// following the giant component.
    #[arg(short, long, default_value_t = 5)]
    num_partitions: usize,

    /// BFS seeds sampled per round.
    #[arg(short = 'r', long, default_value_t = 1000)]
    num_roots: usize,

    /// Maximum depth of a BFS block.
    #[arg(short = 'l', long, default_value_t = 10)]
    max_level: usize,

    /// Stop BFS rounds when the fraction of unclaimed nodes of the giant
    /// component drops below this value.
    #[arg(short, long, default_value_t = 0.1)]
    stop_ratio: f64,

    /// Also write the arcs renumbered with the final ids (`BASENAME.be`).
    #[arg(long)]
    remapped_arcs: bool,

    /// Number of threads (default: one per core).
    #[arg(short, long)]
    threads: Option<usize>,

    /// Increase verbosity (can be repeated).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(2 + args.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let mut main_pl = progress_logger![display_memory = true];
    main_pl.info(format_args!("Loading {}...", args.basename.display()));

    let graph = match args.format {
        Format::Bv => {
            let graph = BvGraph::with_basename(&args.basename)
                .load()
                .with_context(|| format!("Cannot load {}", args.basename.display()))?;
            ArcGraph::from_graph(&graph)
        }
        Format::Arcs => ArcGraph::from_arcs(0, read_pairs(&args.basename)?),
    };
    main_pl.info(format_args!(
        "{} nodes, {} arcs",
        graph.num_nodes(),
        graph.num_arcs()
    ));

    let pipeline = PipelineConfig::new(&args.basename)
        .with_pivot(args.pivot)
        .with_max_iterations(args.max_iterations)
        .with_num_partitions(args.num_partitions)
        .with_num_roots(args.num_roots)
        .with_max_level(args.max_level)
        .with_stop_ratio(args.stop_ratio)
        .with_remapped_arcs(args.remapped_arcs)
        .with_threads(Threads::from(args.threads))
        .build()?;

    let output = pipeline.run(&graph, &mut main_pl)?;
    main_pl.info(format_args!(
        "Pivot {}: zones {:?}, {} blocks, {} partitions, intervals {:?}",
        output.pivot,
        output.zone_sizes,
        output.blocks.len(),
        output.partitions.len(),
        output.intervals
    ));

    Ok(())
}
