use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use diesel::SqliteConnection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use title_catalog::analytics::{self, quality, relations, share, stats};
use title_catalog::config::{AppConfig, load_config_path};
use title_catalog::db::{connection::connect_sqlite, migrate};
use title_catalog::loader::{DuplicatePolicy, store::load_csv_path};
use title_catalog::normalize::{DelimitedField, store::normalize_field};

#[derive(Parser)]
#[command(version, about = "Title catalog CLI")]
struct Cli {
    /// TOML config file
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite path or sqlite: URL (overrides config and DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create or upgrade the schema
    Init,
    /// Load a CSV file into the titles table
    Load {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        /// Treat the first row as data
        #[arg(long)]
        no_headers: bool,
        #[arg(long)]
        delimiter: Option<char>,
        /// Fail instead of keeping the first row per duplicate show_id
        #[arg(long)]
        reject_duplicates: bool,
    },
    /// Rebuild entity and junction tables from the titles table
    Normalize {
        #[arg(long, value_enum, default_value_t = FieldArg::All)]
        field: FieldArg,
    },
    /// Print analytical reports
    Report(ReportCmd),
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Country,
    Genre,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityArg {
    Country,
    Genre,
}

impl From<EntityArg> for DelimitedField {
    fn from(a: EntityArg) -> Self {
        match a {
            EntityArg::Country => DelimitedField::Country,
            EntityArg::Genre => DelimitedField::Genre,
        }
    }
}

#[derive(Args)]
struct ReportCmd {
    #[command(subcommand)]
    sub: ReportSub,
}

#[derive(Subcommand)]
enum ReportSub {
    /// Missing values and duplicate identifiers
    Quality,
    /// Type split, release years, runtimes
    Stats,
    /// Top countries/genres, titles per release year and per year added
    Breakdown {
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Self-joins: shared directors and repeated titles
    Relations {
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Share of a rating per country or genre
    Share {
        #[arg(long, value_enum)]
        field: EntityArg,
        #[arg(long)]
        rating: String,
        #[arg(long)]
        min_titles: Option<i64>,
        #[arg(long)]
        precision: Option<u32>,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => AppConfig::default(),
    };
    cfg.apply_env()?;
    if let Some(url) = &cli.database_url {
        cfg.database_url = url.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_section(title: &str, body: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!("{body}");
}

fn report(conn: &mut SqliteConnection, cfg: &mut AppConfig, sub: ReportSub) -> Result<()> {
    if let ReportSub::Share {
        precision: Some(p), ..
    } = &sub
    {
        cfg.set_precision(*p).context("invalid --precision")?;
    }
    let precision = cfg.report.precision;
    match sub {
        ReportSub::Quality => {
            let missing = quality::missing_values(conn, precision)?;
            print_section("Missing values", &analytics::render(&missing));
            let dups = quality::duplicate_show_ids(conn)?;
            print_section("Duplicate show_id", &analytics::render(&dups));
        }
        ReportSub::Stats => {
            let types = stats::type_breakdown(conn, precision)?;
            print_section("Content types", &analytics::render(&types));
            let years: Vec<_> = stats::release_year_summary(conn)?.into_iter().collect();
            print_section("Release years", &analytics::render(&years));
            let runtimes = stats::runtime_summary(conn)?;
            print_section("Runtimes", &analytics::render(&runtimes));
        }
        ReportSub::Breakdown { limit } => {
            let limit = limit.unwrap_or(cfg.report.limit);
            for field in DelimitedField::ALL {
                let top = relations::top_entities(conn, field, limit)?;
                print_section(&format!("Top {field}"), &analytics::render(&top));
            }
            let by_release = stats::titles_by_release_year(conn, limit)?;
            print_section("Titles by release year", &analytics::render(&by_release));

            let added = stats::titles_added_by_year(conn)?;
            let rows: Vec<Vec<String>> = added
                .by_year
                .iter()
                .map(|(y, n)| vec![y.to_string(), n.to_string()])
                .collect();
            print_section(
                "Titles by year added",
                &analytics::render_table(&["year_added", "titles"], &rows),
            );
            println!("missing date_added: {}  unparsed: {}", added.missing, added.unparsed);
        }
        ReportSub::Relations { limit } => {
            let limit = limit.unwrap_or(cfg.report.limit);
            let shared = relations::shared_director_pairs(conn, limit)?;
            print_section("Directors of both movies and series", &analytics::render(&shared));
            let same = relations::same_title_pairs(conn, limit)?;
            print_section("Repeated titles", &analytics::render(&same));
        }
        ReportSub::Share {
            field,
            rating,
            min_titles,
            ..
        } => {
            let field = DelimitedField::from(field);
            let min_titles = min_titles.unwrap_or(cfg.report.min_titles);
            let rows =
                share::rating_share(conn, field, &rating, min_titles, precision)?;
            print_section(
                &format!("{rating} share by {field} (min {min_titles} titles)"),
                &analytics::render(&rows),
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(&cli)?;
    init_tracing(&cfg.log_level);

    match cli.cmd {
        Cmd::Init => {
            migrate::run_all(&cfg.database_url)?;
        }
        Cmd::Load {
            file,
            no_headers,
            delimiter,
            reject_duplicates,
        } => {
            let mut opts = cfg.load.options()?;
            if no_headers {
                opts.has_headers = false;
            }
            if let Some(d) = delimiter {
                if !d.is_ascii() {
                    anyhow::bail!("--delimiter must be an ASCII character");
                }
                opts.delimiter = d as u8;
            }
            let policy = if reject_duplicates {
                DuplicatePolicy::Reject
            } else {
                cfg.load.duplicate_policy
            };

            migrate::run_all(&cfg.database_url)?;
            let mut conn = connect_sqlite(&cfg.database_url)?;
            let report = load_csv_path(&mut conn, &file, &opts, policy)?;
            print!("{report}");
        }
        Cmd::Normalize { field } => {
            let fields = match field {
                FieldArg::Country => vec![DelimitedField::Country],
                FieldArg::Genre => vec![DelimitedField::Genre],
                FieldArg::All => cfg.normalize.fields.clone(),
            };
            let mut conn = connect_sqlite(&cfg.database_url)?;
            for f in fields {
                let summary = normalize_field(&mut conn, f, &cfg.normalize.separator)?;
                println!("{summary}");
            }
        }
        Cmd::Report(ReportCmd { sub }) => {
            let mut conn = connect_sqlite(&cfg.database_url)?;
            report(&mut conn, &mut cfg, sub)?;
        }
    }

    info!("done");
    Ok(())
}
