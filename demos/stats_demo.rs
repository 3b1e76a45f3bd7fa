use std::hash::BuildHasherDefault;
use std::hash::DefaultHasher;

use bounded_hash::CapacityError;
use bounded_hash::HashMap;
use bounded_hash::hash::CoreBuildHasher;
use bounded_hash::sponge::SipPermutation;
use bounded_hash::sponge::SpongeBuildHasher;
use clap::Parser;
use clap::ValueEnum;

const CAPACITY: usize = 1021;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HasherKind {
    Std,
    Sponge,
}

#[derive(Parser, Debug)]
struct Args {
    /// Number of distinct keys to try inserting
    #[arg(short = 'n', long = "values", default_value_t = 1000)]
    values: u64,

    /// Fraction of inserted keys to remove afterwards, leaving tombstones
    #[arg(short = 'r', long = "remove_ratio", default_value_t = 0.0)]
    remove_ratio: f64,

    #[arg(long = "hasher", value_enum, default_value_t = HasherKind::Std)]
    hasher: HasherKind,
}

fn fill<S: bounded_hash::BuildHasher>(mut map: HashMap<u64, u64, CAPACITY, S>, args: &Args) {
    println!(
        "Filling a map of capacity {} with up to {} values...",
        map.capacity(),
        args.values
    );

    let mut load_failures = 0;
    let mut probe_failures = 0;
    for value in 0..args.values {
        match map.try_insert(value, value) {
            Ok(_) => {}
            Err(CapacityError::LoadFactor { .. }) => load_failures += 1,
            Err(CapacityError::ProbeExhausted { .. }) => probe_failures += 1,
            Err(err) => panic!("unexpected insertion failure: {err}"),
        }
    }

    let to_remove = (map.len() as f64 * args.remove_ratio) as u64;
    let mut removed = 0;
    for value in 0..args.values {
        if removed == to_remove {
            break;
        }
        if map.remove(&value).is_some() {
            removed += 1;
        }
    }

    println!("Inserted {} values, removed {}", map.len() as u64 + removed, removed);
    println!(
        "Rejected: {} by the load factor, {} by an exhausted probe sequence",
        load_failures, probe_failures
    );

    map.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    match args.hasher {
        HasherKind::Std => {
            let builder = CoreBuildHasher::new(BuildHasherDefault::<DefaultHasher>::default());
            fill(HashMap::with_hasher(builder), &args);
        }
        HasherKind::Sponge => {
            let builder = SpongeBuildHasher::new(SipPermutation::default());
            fill(HashMap::with_hasher(builder), &args);
        }
    }
}
