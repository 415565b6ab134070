use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};

use tm_common::context::ContextPaths;
use tm_common::embedding::load_embedder_from_env;
use tm_common::ingest::rebuild_all;
use tm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};

/// Regenerates the vaga, candidato and prospect indices from the persisted
/// record collections. Run after bulk data imports, after changing the
/// embedder, or to heal records that were registered while indexing was
/// unavailable.
#[derive(Debug, Parser)]
#[command(name = "tm-indexer", about = "Rebuild the Talent Match vector indices")]
struct Cli {
    /// Directory holding the record collections
    #[arg(long, env = "TM_DATA_DIR", default_value = "data")]
    data_dir: String,

    /// Directory receiving the rebuilt index files
    #[arg(long, env = "TM_INDEX_DIR", default_value = "models")]
    index_dir: String,
}

fn main() {
    dotenv().ok();
    init_tracing_subscriber("tm-indexer");
    install_tracing_panic_hook("tm-indexer");

    let cli = Cli::parse();
    let paths = ContextPaths::new(&cli.data_dir, &cli.index_dir);

    let (_, embedder) = load_embedder_from_env();
    let Some(embedder) = embedder else {
        error!("embedder disabled; nothing to rebuild");
        std::process::exit(1);
    };

    match rebuild_all(&paths, embedder.as_ref()) {
        Ok(summaries) => {
            for summary in &summaries {
                info!(
                    kind = %summary.kind,
                    processed = summary.processed,
                    indexed = summary.indexed,
                    skipped = summary.skipped_no_text,
                    failed = summary.failed,
                    "rebuild finished"
                );
            }
            let total: usize = summaries.iter().map(|s| s.indexed).sum();
            info!(total_indexed = total, "all indices rebuilt");
        }
        Err(err) => {
            error!(error = %err, "rebuild failed");
            std::process::exit(1);
        }
    }
}
