//! Fills the standard people index with random entries and times a lookup on
//! each index, then prints the last page of names in reverse.
//!
//! `--count`/`PEOPLE_COUNT` (default 100000) and `--seed`/`PEOPLE_SEED`
//! (default 42) set the load; `RUST_LOG` controls log output.

use std::time::Instant;

use clap::Parser;

use multidex::people::{self, Person};
use multidex::{IndexError, MultiIndex};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FIRST_NAMES: [&str; 16] = [
    "Ann", "Bo", "Carla", "Dmitri", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jun", "Kofi",
    "Lawrence", "Mei", "Nils", "Olga", "Priya",
];
const LAST_NAMES: [&str; 8] = [
    "Lee", "Ray", "Okafor", "Novak", "Silva", "Tanaka", "Weber", "Young",
];

#[derive(Debug, Parser)]
#[command(about = "Populate the people index and time one lookup per index")]
struct Args {
    /// Number of random people to insert
    #[arg(long, env = "PEOPLE_COUNT", default_value_t = 100_000)]
    count: usize,

    /// Seed for the people generator
    #[arg(long, env = "PEOPLE_SEED", default_value_t = 42)]
    seed: u64,
}

fn generate(persons: &mut MultiIndex<Person>, count: usize, seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    for _ in 0..count {
        let date = rng.i32(1900..=2000) * 10000 + rng.i32(1..=12) * 100 + rng.i32(1..=31);
        persons.insert(Person::new(
            FIRST_NAMES[rng.usize(..FIRST_NAMES.len())],
            LAST_NAMES[rng.usize(..LAST_NAMES.len())],
            date,
        ));
    }
}

fn main() -> Result<(), IndexError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("multidex=info,people_scenario=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let Args { count, seed } = Args::parse();

    let mut persons = people::standard_index()?;
    let started = Instant::now();
    generate(&mut persons, count, seed);
    info!(count, elapsed = ?started.elapsed(), "populated");

    let queries: [(&str, &dyn std::any::Any); 4] = [
        (people::YEAR, &1971),
        (people::MONTH, &"Nov"),
        (people::DAY, &17),
        (people::NAME, &"Lawrence".to_string()),
    ];
    for (index, key) in queries {
        let started = Instant::now();
        let found = persons.index(index)?.lookup_exact(key)?;
        if found.any() {
            info!(index, found = found.len(), elapsed = ?started.elapsed(), "lookup");
        } else {
            info!(index, elapsed = ?started.elapsed(), "lookup found nothing");
        }
    }

    let page = (count / 10).min(10);
    let names = persons.typed_index::<String>(people::NAME)?;
    println!("last {page} by name, descending:");
    for person in names.enumerate_ordered_rev().take(page) {
        println!("{}", &**person);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args =
            Args::try_parse_from(["people_scenario", "--count", "10", "--seed", "7"]).unwrap();
        assert_eq!((args.count, args.seed), (10, 7));
    }

    #[test]
    fn malformed_settings_are_rejected() {
        assert!(Args::try_parse_from(["people_scenario", "--count", "ten"]).is_err());
        assert!(Args::try_parse_from(["people_scenario", "--count", "-5"]).is_err());
        assert!(Args::try_parse_from(["people_scenario", "--seed", "x"]).is_err());
    }

    #[test]
    fn generated_people_fill_every_index() {
        let mut persons = people::standard_index().unwrap();
        generate(&mut persons, 50, 3);
        for name in persons.index_names() {
            assert_eq!(persons.index(name).unwrap().len(), 50, "index {name}");
        }
    }
}
