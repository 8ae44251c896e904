use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use influence_max::app::dto::{AlgorithmKind, CompareRequest, SelectRequest};
use influence_max::app::engine::{DEFAULT_SEED, EngineConfig, InfluenceEngine};
use influence_max::cli::{self, GraphKind};
use influence_max::domain::model::DiffusionModel;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "imtool",
    version,
    about = "Influence maximization with naive greedy and CELF",
    long_about = None
)]
struct Args {
    /// Base random seed for generation, sealing and simulation.
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Run Monte-Carlo trials on all cores.
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GraphArgs {
    /// Network family.
    #[arg(long, value_enum, default_value_t = GraphKind::Small)]
    graph: GraphKind,

    /// Number of nodes (ignored for the small graph).
    #[arg(long, default_value_t = 100)]
    nodes: usize,

    /// BA attachment count or WS lattice degree.
    #[arg(long)]
    degree: Option<usize>,

    /// WS rewiring or ER edge probability.
    #[arg(long)]
    prob: Option<f64>,

    /// Diffusion model: IC or LT.
    #[arg(long, default_value = "IC")]
    model: DiffusionModel,

    /// Number of seeds to select.
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Monte-Carlo trials per spread estimate.
    #[arg(long, default_value_t = 1000)]
    simulations: usize,

    /// Print the full response as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select seeds with one algorithm.
    Select {
        #[arg(long, value_enum, default_value_t = AlgorithmKind::Celf)]
        algorithm: AlgorithmKind,

        #[command(flatten)]
        graph: GraphArgs,
    },
    /// Run naive greedy and CELF on the same graph.
    Compare {
        #[command(flatten)]
        graph: GraphArgs,
    },
    /// Run the four-experiment suite and write CSV files.
    Experiments {
        #[arg(long, default_value = "results")]
        out_dir: PathBuf,

        /// Use the small smoke-test plan.
        #[arg(long, default_value_t = false)]
        quick: bool,
    },
    /// Start the HTTP server.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let engine = InfluenceEngine::new(EngineConfig {
        seed: args.seed,
        parallel: args.parallel,
    });

    match args.command {
        Command::Select { algorithm, graph } => {
            let req = SelectRequest {
                graph: cli::graph_spec(graph.graph, graph.nodes, graph.degree, graph.prob),
                model: graph.model,
                algorithm,
                k: graph.k,
                num_simulations: graph.simulations,
                seed: None,
            };
            cli::select_and_display(&engine, req, graph.json)?;
        }
        Command::Compare { graph } => {
            let req = CompareRequest {
                graph: cli::graph_spec(graph.graph, graph.nodes, graph.degree, graph.prob),
                model: graph.model,
                k: graph.k,
                num_simulations: graph.simulations,
                seed: None,
            };
            cli::compare_and_display(&engine, req, graph.json)?;
        }
        Command::Experiments { out_dir, quick } => {
            cli::run_experiments(&engine, &out_dir, quick)?;
        }
        Command::Serve { addr } => {
            let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            rt.block_on(influence_max::server::http::serve(engine, addr))?;
        }
    }

    Ok(())
}
