use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use u_exam_schedule::generator::{self, ExamInstance, GeneratorConfig};
use u_exam_schedule::models::ExamCalendar;
use u_exam_schedule::penalty::CONFLICT_PENALTY;
use u_exam_schedule::scheduler::{ExamScheduler, ScheduleKpi, SchedulerConfig, Solution};
use u_exam_schedule::validation::validate_input;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of days in the exam period
    #[arg(long, default_value_t = 20)]
    days: u32,

    /// Day indices that cannot hold exams
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    holidays: Vec<u32>,

    /// Master seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run both solvers concurrently
    #[arg(long)]
    parallel: bool,

    /// Keep the best GA individual across generations
    #[arg(long)]
    elitism: bool,

    /// Scheduler configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exam instance with subjects and students (JSON); generated if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the solution and KPIs as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    debug: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn solver_line(name: &str, penalty: f64, elapsed: Duration) {
    println!(
        "{name} finished in {:.4}s. Penalty: {penalty:.4}",
        elapsed.as_secs_f64()
    );
    if penalty >= CONFLICT_PENALTY {
        println!("  Status: constraint violated (same-day exams)");
    } else {
        println!("  Status: valid");
    }
}

fn print_report(solution: &Solution, kpi: &ScheduleKpi) {
    solver_line(
        "Simulated Annealing",
        solution.annealing_penalty,
        solution.annealing_time,
    );
    solver_line(
        "Genetic Algorithm",
        solution.genetic_penalty,
        solution.genetic_time,
    );
    println!();
    println!(
        "Best schedule ({}), penalty {:.4}",
        solution.algorithm, solution.penalty
    );
    if !kpi.is_conflict_free() {
        println!("{} same-day conflict(s)", kpi.conflicts);
    }

    let mut current_day = None;
    let mut rows: Vec<_> = solution
        .schedule
        .iter()
        .map(|(s, d)| (d, s.name()))
        .collect();
    rows.sort();
    for (day, name) in rows {
        if current_day != Some(day) {
            println!("\nDay {day}:");
            current_day = Some(day);
        }
        println!("  - {name}");
    }

    println!();
    println!("Days used: {}", kpi.days_used);
    if let Some(gap) = kpi.min_gap {
        println!("Tightest spacing: {gap} day(s)");
    }
    println!(
        "Per-student penalty: mean {:.4}, max {:.4}",
        kpi.mean_student_penalty, kpi.max_student_penalty
    );
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let mut config: SchedulerConfig = match &cli.config {
        Some(path) => read_json(path)?,
        None => SchedulerConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.parallel |= cli.parallel;
    config.genetic.elitism |= cli.elitism;

    let calendar = ExamCalendar::new(cli.days).with_holidays(cli.holidays.iter().copied());

    let instance: ExamInstance = match &cli.input {
        Some(path) => read_json(path)?,
        None => {
            let mut rng = match config.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            generator::generate(&GeneratorConfig::default(), &mut rng)?
        }
    };
    info!(
        subjects = instance.subjects.len(),
        students = instance.students.len(),
        days = calendar.num_days,
        available_days = calendar.available_day_count(),
        "loaded exam instance"
    );

    if let Err(errors) = validate_input(&instance.subjects, &instance.students, &calendar) {
        for e in &errors {
            warn!(kind = ?e.kind, "{}", e.message);
        }
        anyhow::bail!("input failed validation with {} error(s)", errors.len());
    }

    let solution = ExamScheduler::new(config.clone()).solve(
        &instance.subjects,
        &instance.students,
        &calendar,
    )?;
    let kpi = ScheduleKpi::calculate(
        &solution.schedule,
        &instance.students,
        &calendar,
        &config.penalty,
    );

    if cli.json {
        let report = serde_json::json!({ "solution": solution, "kpi": kpi });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&solution, &kpi);
    }

    Ok(())
}
