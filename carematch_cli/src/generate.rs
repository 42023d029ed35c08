use std::path::PathBuf;

use anyhow::Context;
use carematch_allocator::{
    json::types::JsonAllocationProblem,
    problem::{
        allocation_problem::AllocationProblemBuilder, helper::HelperBuilder,
        hospital::HospitalBuilder, location::Location,
    },
};
use clap::Subcommand;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Schema file to write
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// Write the schema of the result document instead of the problem
        #[arg(long)]
        output_schema: bool,
    },
    RandomProblem {
        /// Problem file to write
        #[arg(long, short = 'o')]
        out: PathBuf,

        #[arg(long, default_value_t = 3)]
        hospitals: usize,

        #[arg(long, default_value_t = 14)]
        helpers: usize,

        #[arg(long, value_delimiter = ',', default_value = "admin,logistic,medical")]
        skills: Vec<String>,

        /// Seed for a reproducible problem
        #[arg(long)]
        seed: Option<u64>,
    },
}

// Rough bounding box of Germany, (lat, lon).
const MIN_CORNER: (f64, f64) = (47.3, 5.9);
const MAX_CORNER: (f64, f64) = (55.0, 15.0);

fn random_location(rng: &mut SmallRng) -> Location {
    Location::from_lat_lon(
        rng.random_range(MIN_CORNER.0..MAX_CORNER.0),
        rng.random_range(MIN_CORNER.1..MAX_CORNER.1),
    )
}

fn random_problem(
    num_hospitals: usize,
    num_helpers: usize,
    skills: &[String],
    seed: Option<u64>,
) -> anyhow::Result<JsonAllocationProblem> {
    anyhow::ensure!(!skills.is_empty(), "at least one skill is required");

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let mut builder = AllocationProblemBuilder::default();

    for index in 0..num_hospitals {
        let mut hospital = HospitalBuilder::new(format!("H{index}"), random_location(&mut rng));
        for skill in skills {
            hospital.add_demand(skill.clone(), rng.random_range(0..=4));
        }
        builder.add_hospital(hospital.build());
    }

    let mut pool = skills.to_vec();
    for index in 0..num_helpers {
        let mut helper = HelperBuilder::new(format!("W{index}"), random_location(&mut rng));
        pool.shuffle(&mut rng);
        let count = rng.random_range(1..=pool.len().min(2));
        for skill in &pool[..count] {
            helper.add_skill(skill.clone());
        }
        builder.add_helper(helper.build());
    }

    let problem = builder.build().context("generated problem is invalid")?;

    Ok(JsonAllocationProblem::from_problem(&problem))
}

fn write_file(out: &PathBuf, content: String) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, content)?;
    info!("Wrote {:?}", out);

    Ok(())
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out, output_schema } => {
            let schema = if output_schema {
                carematch_allocator::json::schema::generate_result_json_schema()?
            } else {
                carematch_allocator::json::schema::generate_json_schema()?
            };

            write_file(&out, schema)?;
        }
        GenerateSubcommands::RandomProblem {
            out,
            hospitals,
            helpers,
            skills,
            seed,
        } => {
            let problem = random_problem(hospitals, helpers, &skills, seed)?;
            write_file(&out, serde_json::to_string_pretty(&problem)?)?;
        }
    }

    Ok(())
}
