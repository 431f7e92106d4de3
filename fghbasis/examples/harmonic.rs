use fghbasis::{
    basis::QuantumNumbers,
    grid::RList,
    solve::{ into_entries, Lapack, System },
    store::{ BasisStore, BasisWriter },
};

// solve for eigenstates of the harmonic oscillator and store them in memory

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const MASS: f64 = 1.0;
    const LEVELS: usize = 5;

    let r_list = RList::new(-8.0, 8.0, 0.05);
    let system = System::new_fn(r_list, |x| 0.5 * x * x)?;
    let n = system.len() as f64;
    let sols = system.solve(MASS, &Lapack)?;

    // with this kinetic scaling the exact levels are (v + ½) N / (N - 1)
    for (v, sol) in sols.iter().take(LEVELS).enumerate() {
        let exact = (v as f64 + 0.5) * n / (n - 1.0);
        println!("v = {v}: E = {:.10} (exact {:.10})", sol.e, exact);
    }

    let entries = into_entries(&sols, r_list, QuantumNumbers::default(), LEVELS);
    let mut writer = BasisWriter::new(Vec::new())?;
    entries.iter().try_for_each(|entry| writer.write(entry))?;
    let bytes = writer.finish()?;

    let mut store = BasisStore::from_reader(std::io::Cursor::new(bytes))?;
    let ground = store.get(0)?;
    println!(
        "stored {} entries; ψ₀(0) = {:.6}",
        store.count(),
        ground.value(r_list.point_count() / 2),
    );
    Ok(())
}
