use std::{ fs, path::PathBuf };
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use fghbasis::{
    basis::QuantumNumbers,
    config::FghJob,
    grid::RList,
    solve::{ into_entries, Lapack, System },
    store::write_basis,
    units,
};

// ¹H mass; amu
const M_H: f64 = 1.00782503207;

/// Compute vibrational levels of a Morse potential and write them to a basis
/// file.
#[derive(Debug, Parser)]
struct Cli {
    /// JSON job description; defaults to H₂ on a 0.4-8.0 bohr grid.
    #[arg(long)]
    job: Option<PathBuf>,

    /// Well depth (Hartree).
    #[arg(long, default_value_t = 0.1744)]
    de: f64,

    /// Range parameter (bohr⁻¹).
    #[arg(long, default_value_t = 1.02764)]
    a: f64,

    /// Equilibrium bond length (bohr).
    #[arg(long, default_value_t = 1.40201)]
    re: f64,

    /// Output basis file.
    #[arg(short, long, default_value = "output/morse.basis")]
    output: PathBuf,
}

fn default_job() -> FghJob {
    let m = units::amu_to_au(M_H);
    FghJob {
        mass: units::reduced_mass(m, m),
        r_list: RList::new(0.4, 8.0, 0.02),
        levels: 10,
        quantum: QuantumNumbers { p: 1, spin_mult: 1, ..Default::default() },
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

    let job = match &cli.job {
        Some(path) => FghJob::from_json_file(path)
            .with_context(|| format!("loading job {}", path.display()))?,
        None => default_job(),
    };
    let (de, a, re) = (cli.de, cli.a, cli.re);
    let system = System::new_fn(job.r_list, |r| de * (1.0 - (-a * (r - re)).exp()).powi(2) - de)?;
    info!(points = system.len(), mass = job.mass, "solving");

    let sols = system.solve(job.mass, &Lapack)?;
    let entries = into_entries(&sols, job.r_list, job.quantum, job.levels);
    if let Some(e0) = entries.first().map(|e| e.eigenval) {
        for entry in entries.iter() {
            info!(
                v = entry.quantum.v,
                energy = entry.eigenval,
                above_ground_cm = units::hartree_to_wavenumber(entry.eigenval - e0),
                "level",
            );
        }
    }

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let count = write_basis(&cli.output, &entries)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(count, path = %cli.output.display(), "wrote basis");
    Ok(())
}
