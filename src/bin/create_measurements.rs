use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_distr::Normal;

const BUILTIN_STATIONS: &str = "\
Abha;18.0
Abidjan;26.0
Accra;26.4
Addis Ababa;16.0
Baghdad;22.77
Bangkok;28.6
Bulawayo;18.9
Cairo;21.4
Dakar;24.0
Hamburg;9.7
Istanbul;13.9
İzmir;17.9
Jakarta;26.7
Las Palmas de Gran Canaria;21.2
Melbourne;15.1
Palembang;27.3
Reykjavík;4.3
San Francisco;14.6
São Paulo;19.2
St. John's;5.0
Tokyo;15.4
Yellowknife;-4.3
Zürich;9.3";

/// Write synthetic `<station>;<value>` measurements to stdout
#[derive(Parser)]
#[command(name = "create_measurements")]
struct Cli {
    /// Number of lines to generate (underscores allowed, e.g. 1_000_000)
    rows: String,

    /// Station list, one `<name>;<mean>` per line, `#` for comments
    #[arg(long)]
    stations: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug)]
struct City {
    name: String,
    distribution: Normal<f64>,
}

impl City {
    fn new(name: &str, mean: f64) -> Result<Self, ParseCityError> {
        Ok(Self {
            name: name.to_string(),
            distribution: Normal::new(mean, 10.0).map_err(|_| ParseCityError)?,
        })
    }

    fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.distribution.sample(rng).clamp(-99.9, 99.9)
    }
}

#[derive(Debug)]
struct ParseCityError;

impl FromStr for City {
    type Err = ParseCityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, mean_str) = s.split_once(';').ok_or(ParseCityError)?;
        let mean: f64 = mean_str.trim().parse().map_err(|_| ParseCityError)?;
        City::new(name, mean)
    }
}

fn parse_cities(text: &str) -> Result<Vec<City>> {
    text.lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| {
            line.parse::<City>()
                .map_err(|_| anyhow::anyhow!("failed to parse station: {line:?}"))
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let num: u64 = cli
        .rows
        .replace('_', "")
        .parse()
        .with_context(|| format!("expected an integer row count, got {:?}", cli.rows))?;

    let cities = match &cli.stations {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            parse_cities(&text)?
        }
        None => parse_cities(BUILTIN_STATIONS)?,
    };
    if cities.is_empty() {
        bail!("station list is empty");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for _ in 0..num {
        let city = &cities[rng.random_range(0..cities.len())];
        let temp = city.sample(&mut rng);
        writeln!(out, "{};{:.1}", city.name, temp)?;
    }
    out.flush()?;

    Ok(())
}
