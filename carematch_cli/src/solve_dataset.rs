use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use carematch_allocator::solver::solver_params::AllocatorParams;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use tracing::{error, info};

use crate::{
    file_utils::json_files,
    parsers,
    solve::{read_problem, solve_problem, write_result},
};

#[derive(Args)]
pub struct SolveDatasetArgs {
    /// A problem file or a folder of problem files
    #[arg(short, long)]
    dataset: PathBuf,

    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Output folder for the .result.json files, mirroring the dataset layout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    tie_breaking: bool,

    #[arg(long)]
    implicit_zero_demand: bool,
}

/// Path of a problem file relative to the dataset, used both as its name in
/// the summary and as its place below the output folder.
fn relative_path<'a>(dataset: &Path, path: &'a Path) -> &'a Path {
    match path.strip_prefix(dataset) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    }
}

fn result_path(output: &Path, relative: &Path) -> PathBuf {
    output.join(relative).with_extension("result.json")
}

fn solve_dataset(args: &SolveDatasetArgs) -> anyhow::Result<Table> {
    let paths = json_files(&args.dataset)?;

    let params = AllocatorParams {
        max_solve_time: match args.timeout {
            Some(timeout) => Some(timeout),
            None => parsers::max_solve_time_from_env()?,
        },
        tie_breaking: args.tie_breaking,
        ..AllocatorParams::default()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "File",
        "Hospitals",
        "Helpers",
        "Status",
        "Objective",
        "Assigned",
        "Time",
    ]);

    for path in &paths {
        let relative = relative_path(&args.dataset, path);
        let name = relative.display().to_string();

        let problem = match read_problem(path, args.implicit_zero_demand) {
            Ok(problem) => problem,
            Err(err) => {
                error!("Skipping {:?}: {}", path, err);
                table.add_row(vec![name, "-".into(), "-".into(), "invalid".into()]);
                continue;
            }
        };

        let num_hospitals = problem.num_hospitals().to_string();
        let num_helpers = problem.num_helpers().to_string();

        let start = Instant::now();
        let result = match solve_problem(problem, params.clone()) {
            Ok(result) => result,
            Err(err) => {
                error!("Solving {:?} failed: {}", path, err);
                table.add_row(vec![name, num_hospitals, num_helpers, "error".into()]);
                continue;
            }
        };
        let elapsed = start.elapsed();

        if let Some(output) = &args.output {
            write_result(&result, Some(result_path(output, relative).as_path()))?;
        }

        table.add_row(vec![
            name,
            num_hospitals,
            num_helpers,
            result.status().to_string(),
            result
                .objective()
                .map(|objective| objective.to_string())
                .unwrap_or_else(|| "-".into()),
            result.assignment_count().to_string(),
            format!("{elapsed:.2?}"),
        ]);
    }

    Ok(table)
}

pub fn run(args: SolveDatasetArgs) -> anyhow::Result<()> {
    info!("Solving dataset {:?}", args.dataset);
    let table = solve_dataset(&args)?;

    println!("{table}");

    Ok(())
}
