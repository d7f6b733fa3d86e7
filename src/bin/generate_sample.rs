use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// One row of `train.csv`. `None` fields are written as empty cells.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Passenger {
    passenger_id: u32,
    survived: u8,
    pclass: u8,
    name: String,
    sex: &'static str,
    age: Option<f64>,
    sib_sp: u8,
    parch: u8,
    ticket: String,
    fare: f64,
    cabin: Option<String>,
    embarked: Option<&'static str>,
}

const PASSENGERS: u32 = 891;

const SURNAMES: [&str; 12] = [
    "Braund", "Cumings", "Heikkinen", "Futrelle", "Allen", "Moran", "McCarthy", "Palsson",
    "Johnson", "Nasser", "Sandstrom", "Bonnell",
];
const GIVEN_MALE: [&str; 6] = ["Owen", "William", "James", "Timothy", "Gosta", "Charles"];
const GIVEN_FEMALE: [&str; 6] = ["Laina", "Florence", "Lily", "Elisabeth", "Marguerite", "Adele"];

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn passenger(id: u32, rng: &mut StdRng) -> Passenger {
    let pclass = match rng.gen_range(0..100) {
        0..=23 => 1,
        24..=44 => 2,
        _ => 3,
    };
    let female = rng.gen_bool(0.35);

    let age = if rng.gen_bool(0.2) {
        None
    } else {
        let centre = match pclass {
            1 => 38.0,
            2 => 30.0,
            _ => 25.0,
        };
        let a = gauss(rng, centre, 14.0).clamp(0.42, 80.0);
        // Children get fractional ages only below one year.
        Some(if a < 1.0 { (a * 100.0).round() / 100.0 } else { a.round() })
    };

    let fare = match pclass {
        1 => gauss(rng, 4.2, 0.6).exp(),
        2 => gauss(rng, 2.9, 0.35).exp(),
        _ => gauss(rng, 2.3, 0.35).exp(),
    };
    let fare = (fare.max(0.0) * 10_000.0).round() / 10_000.0;

    let mut p_survive: f64 = if female { 0.74 } else { 0.19 };
    p_survive += match pclass {
        1 => 0.15,
        2 => 0.03,
        _ => -0.1,
    };
    if age.is_some_and(|a| a < 12.0) {
        p_survive += 0.2;
    }
    let survived = u8::from(rng.gen_bool(p_survive.clamp(0.02, 0.98)));

    let surname = SURNAMES[rng.gen_range(0..SURNAMES.len())];
    let (title, given) = if female {
        ("Mrs.", GIVEN_FEMALE[rng.gen_range(0..GIVEN_FEMALE.len())])
    } else {
        ("Mr.", GIVEN_MALE[rng.gen_range(0..GIVEN_MALE.len())])
    };

    let cabin = ((pclass == 1 && rng.gen_bool(0.8)) || rng.gen_bool(0.05)).then(|| {
        let deck = ['A', 'B', 'C', 'D', 'E'][rng.gen_range(0..5)];
        format!("{deck}{}", rng.gen_range(1..130))
    });
    let embarked = match rng.gen_range(0..1000) {
        0..=1 => None,
        2..=190 => Some("C"),
        191..=276 => Some("Q"),
        _ => Some("S"),
    };

    Passenger {
        passenger_id: id,
        survived,
        pclass,
        name: format!("{surname}, {title} {given}"),
        sex: if female { "female" } else { "male" },
        age,
        sib_sp: if rng.gen_bool(0.3) { rng.gen_range(1..5) } else { 0 },
        parch: if rng.gen_bool(0.25) { rng.gen_range(1..4) } else { 0 },
        ticket: format!("{}", rng.gen_range(100_000..400_000)),
        fare,
        cabin,
        embarked,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);

    let output_path = "train.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    for id in 1..=PASSENGERS {
        writer
            .serialize(passenger(id, &mut rng))
            .with_context(|| format!("writing passenger {id}"))?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {PASSENGERS} passengers to {output_path}");
    Ok(())
}
