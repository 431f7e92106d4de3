use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use fghbasis::{ basis::BasisEntry, store::BasisStore };

/// Print the contents of a basis file.
#[derive(Debug, Parser)]
struct Cli {
    /// Basis file to read.
    path: PathBuf,

    /// Print only the entry at this index.
    #[arg(short, long)]
    index: Option<usize>,

    /// Also print the scaled eigenvector values.
    #[arg(short, long)]
    values: bool,
}

fn print_entry(index: usize, entry: &BasisEntry, values: bool) {
    let q = &entry.quantum;
    println!(
        "{index:>6}  J={} v={} n={} j={} l={} p={:+} c={} 2S+1={}  E={:.10e}  norm={:.6e}  r=[{}, {}; {}]",
        q.J, q.v, q.n, q.j, q.l, q.p, q.c, q.spin_mult,
        entry.eigenval, entry.norm,
        entry.r_list.r_min, entry.r_list.r_max, entry.r_list.r_step,
    );
    if values {
        entry.values().for_each(|x| println!("        {x:.10e}"));
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();
    let cli = Cli::parse();

    let mut store = BasisStore::open(&cli.path)
        .with_context(|| format!("opening {}", cli.path.display()))?;
    debug!(count = store.count(), stride = store.stride(), "opened");
    println!(
        "# {}: {} entries, {} points each",
        cli.path.display(), store.count(), store.vector_len(),
    );
    match cli.index {
        Some(index) => {
            let entry = store.get(index)?;
            print_entry(index, entry, cli.values);
        },
        None => {
            for (index, entry) in store.iter().enumerate() {
                print_entry(index, &entry?, cli.values);
            }
        },
    }
    Ok(())
}
