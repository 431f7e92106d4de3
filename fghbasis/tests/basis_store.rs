use std::{
    fs,
    path::Path,
    sync::{ Arc, Mutex },
    thread,
};
use ndarray as nd;
use fghbasis::{
    basis::{ BasisEntry, QuantumNumbers },
    error::BasisError,
    grid::RList,
    store::{ read_entries, write_basis, BasisStore, BasisWriter, HEADER_SIZE, record_size },
};

// small deterministic generator so fixtures don't need a rand dependency
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64 * 2.0 - 1.0
    }
}

fn random_entries(k: usize, len: usize, seed: u64) -> Vec<BasisEntry> {
    let mut rng = Lcg(seed);
    (0..k)
        .map(|_| {
            let quantum = QuantumNumbers {
                J: rng.next_u32() % 50,
                v: rng.next_u32() % 30,
                n: rng.next_u32(),
                j: rng.next_u32() % 40,
                l: rng.next_u32() % 60,
                p: if rng.next_u32() % 2 == 0 { 1 } else { -1 },
                c: rng.next_u32() % 3,
                spin_mult: (rng.next_u32() % 5) as u8 + 1,
            };
            let r_list = RList::new(0.5, 0.5 + (len - 1) as f64 * 0.05, 0.05);
            let eigenvec: nd::Array1<f64> = (0..len).map(|_| rng.next_f64()).collect();
            BasisEntry::new(quantum, r_list, rng.next_f64() * 1e3, eigenvec)
                .with_norm(1.0 + rng.next_f64().abs())
        })
        .collect()
}

fn assert_bitwise_eq(a: &BasisEntry, b: &BasisEntry) {
    assert_eq!(a.quantum, b.quantum);
    assert_eq!(a.norm.to_bits(), b.norm.to_bits());
    assert_eq!(a.eigenval.to_bits(), b.eigenval.to_bits());
    assert_eq!(a.r_list.r_min.to_bits(), b.r_list.r_min.to_bits());
    assert_eq!(a.r_list.r_max.to_bits(), b.r_list.r_max.to_bits());
    assert_eq!(a.r_list.r_step.to_bits(), b.r_list.r_step.to_bits());
    assert_eq!(a.eigenvec.len(), b.eigenvec.len());
    a.eigenvec.iter().zip(&b.eigenvec)
        .for_each(|(x, y)| assert_eq!(x.to_bits(), y.to_bits()));
}

fn write_fixture(path: &Path, entries: &[BasisEntry]) {
    let written = write_basis(path, entries).unwrap();
    assert_eq!(written, entries.len());
}

#[test]
fn roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basis.bin");
    let entries = random_entries(17, 40, 7);
    write_fixture(&path, &entries);

    let size = fs::metadata(&path).unwrap().len();
    assert_eq!(size, HEADER_SIZE + 17 * record_size(40));

    let mut store = BasisStore::open(&path).unwrap();
    assert_eq!(store.count(), 17);
    assert_eq!(store.vector_len(), 40);
    for (k, expected) in entries.iter().enumerate() {
        assert_bitwise_eq(store.get(k).unwrap(), expected);
    }
    let streamed = read_entries(fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(streamed.len(), 17);
    streamed.iter().zip(&entries).for_each(|(a, b)| assert_bitwise_eq(a, b));
}

#[test]
fn access_order_does_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basis.bin");
    let entries = random_entries(12, 9, 42);
    write_fixture(&path, &entries);

    let mut store = BasisStore::open(&path).unwrap();
    let forward: Vec<BasisEntry>
        = (0..12).map(|k| store.get(k).unwrap().clone()).collect();
    for k in (0..12).rev() {
        assert_bitwise_eq(store.get(k).unwrap(), &forward[k]);
    }
    let mut rng = Lcg(3);
    for _ in 0..50 {
        let k = rng.next_u32() as usize % 12;
        assert_bitwise_eq(store.get(k).unwrap(), &forward[k]);
        // repeats hit the cache
        assert_bitwise_eq(store.get(k).unwrap(), &forward[k]);
    }
    let iterated: Vec<BasisEntry>
        = store.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(iterated, forward);
}

#[test]
fn out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basis.bin");
    write_fixture(&path, &random_entries(3, 4, 1));
    let mut store = BasisStore::open(&path).unwrap();
    assert!(matches!(
        store.get(3),
        Err(BasisError::IndexOutOfRange { index: 3, count: 3 }),
    ));
    // the store stays usable after an error
    assert!(store.get(2).is_ok());

    let empty = dir.path().join("empty.bin");
    BasisWriter::create(&empty).unwrap().finish().unwrap();
    let mut store = BasisStore::open(&empty).unwrap();
    assert_eq!(store.count(), 0);
    assert!(matches!(
        store.get(0),
        Err(BasisError::IndexOutOfRange { index: 0, count: 0 }),
    ));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        BasisStore::open(dir.path().join("nope.bin")),
        Err(BasisError::Io(_)),
    ));
}

#[test]
fn truncated_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basis.bin");
    write_fixture(&path, &random_entries(4, 6, 9));
    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 8);
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(BasisStore::open(&path), Err(BasisError::Corrupt(_))));
}

#[test]
fn shared_store_behind_mutex() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basis.bin");
    let entries = Arc::new(random_entries(20, 16, 11));
    write_fixture(&path, &entries);

    // one handle, one cursor: each seek + read must happen under the lock
    let store = Arc::new(Mutex::new(BasisStore::open(&path).unwrap()));
    let handles: Vec<_>
        = (0..4_u64)
        .map(|t| {
            let store = Arc::clone(&store);
            let entries = Arc::clone(&entries);
            thread::spawn(move || {
                let mut rng = Lcg(t + 100);
                for _ in 0..200 {
                    let k = rng.next_u32() as usize % entries.len();
                    let mut guard = store.lock().unwrap();
                    assert_bitwise_eq(guard.get(k).unwrap(), &entries[k]);
                }
            })
        })
        .collect();
    handles.into_iter().for_each(|h| h.join().unwrap());
}

#[test]
fn independent_stores_on_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(dir.path().join("basis.bin"));
    let entries = Arc::new(random_entries(20, 16, 13));
    write_fixture(&path, &entries);

    let handles: Vec<_>
        = (0..4_u64)
        .map(|t| {
            let path = Arc::clone(&path);
            let entries = Arc::clone(&entries);
            thread::spawn(move || {
                let mut store = BasisStore::open(&*path).unwrap();
                let mut rng = Lcg(t + 200);
                for _ in 0..200 {
                    let k = rng.next_u32() as usize % entries.len();
                    assert_bitwise_eq(store.get(k).unwrap(), &entries[k]);
                }
            })
        })
        .collect();
    handles.into_iter().for_each(|h| h.join().unwrap());
}
