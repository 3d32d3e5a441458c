use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hourbook::report::{output_path, write_attendance_csv, write_stats_issues_csv, write_workbook};
use hourbook::{Ingestion, SchemaChoice, SchemaVersion, ShopCalendar, ingest, init};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Student hours and shop attendance from a form export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty export template and optionally a shop calendar
    Init {
        name: String,
        #[arg(short, long, value_enum, default_value_t = SchemaVersion::Current)]
        schema: SchemaVersion,
        /// Also write the default shop calendar here
        #[arg(short, long)]
        calendar: Option<PathBuf>,
    },
    /// Ingest an export and print every issue found
    Check {
        input: PathBuf,
        #[arg(short, long)]
        calendar: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = SchemaArg::Auto)]
        schema: SchemaArg,
        /// Also write the shop day issues as CSV
        #[arg(long)]
        issues_csv: Option<PathBuf>,
        /// Also write every student's shop day status as CSV
        #[arg(long)]
        attendance_csv: Option<PathBuf>,
    },
    /// Ingest an export and write the xlsx report
    Report {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        calendar: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = SchemaArg::Auto)]
        schema: SchemaArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaArg {
    Auto,
    Legacy,
    Current,
}

impl From<SchemaArg> for SchemaChoice {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Auto => SchemaChoice::Detect,
            SchemaArg::Legacy => SchemaChoice::Fixed(SchemaVersion::Legacy),
            SchemaArg::Current => SchemaChoice::Fixed(SchemaVersion::Current),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            name,
            schema,
            calendar,
        } => {
            let path = init::write_template(&name, schema)?;
            println!("Created CSV template: {}", path.display());
            if let Some(calendar) = calendar {
                init::write_calendar_template(&calendar)?;
                println!("Created shop calendar: {}", calendar.display());
            }
        }
        Command::Check {
            input,
            calendar,
            schema,
            issues_csv,
            attendance_csv,
        } => {
            let ingestion = run(&input, calendar.as_deref(), schema.into())?;
            print_summary(&ingestion);
            if let Some(path) = issues_csv {
                write_stats_issues_csv(&ingestion, &path)?;
                println!("Shop day issues written: {}", path.display());
            }
            if let Some(path) = attendance_csv {
                write_attendance_csv(&ingestion, &path)?;
                println!("Attendance written: {}", path.display());
            }
        }
        Command::Report {
            input,
            output,
            calendar,
            schema,
        } => {
            let ingestion = run(&input, calendar.as_deref(), schema.into())?;
            let output = output_path(&input, output);
            write_workbook(&ingestion, &output)?;
            println!("Report generated: {}", output.display());
        }
    }
    Ok(())
}

fn run(input: &Path, calendar: Option<&Path>, schema: SchemaChoice) -> Result<Ingestion> {
    let calendar = match calendar {
        Some(path) => ShopCalendar::load(path)?,
        None => {
            log::info!("no shop calendar given, using the built-in dates");
            ShopCalendar::default()
        }
    };
    let document = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    Ok(ingest(&document, &calendar, schema))
}

fn print_summary(ingestion: &Ingestion) {
    println!(
        "{} records, {} students ({:?} schema)",
        ingestion.records.len(),
        ingestion.stats.len(),
        ingestion.schema
    );

    println!("\nIssues ({}):", ingestion.issues.len());
    for issue in &ingestion.issues {
        println!("  {issue}");
    }

    println!("\nShop day issues ({}):", ingestion.stats_issues.len());
    for issue in &ingestion.stats_issues {
        println!("  {} {}: {}", issue.date, issue.student, issue.issue);
    }

    println!("\nStudents:");
    for (student, stats) in ingestion.stats.iter() {
        let missed = ingestion.attendance.get(student).map_or(0, |days| {
            days.iter().filter(|d| d.is_missed()).count()
        });
        println!(
            "  {student:<28} volunteer {:>6} h  shop days {:>3}  missed {:>3}",
            stats.volunteer_hours, stats.shop_days_present, missed
        );
    }
}
