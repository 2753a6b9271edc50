//! sqlweave: compile and run query definitions
//!
//! # Usage
//!
//! ```bash
//! # Show SQL and bound parameters
//! sqlweave enrolled.toml
//!
//! # Postgres placeholders, values inline
//! sqlweave enrolled.toml --dialect postgres --inline
//!
//! # Execute against a database
//! sqlweave enrolled.toml --execute --database-url sqlite://moodle.db --prefix mdl_
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlweave::prelude::*;

#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(version)]
#[command(about = "Compile declarative query definitions to SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlweave enrolled.toml
    sqlweave enrolled.toml --dialect postgres --format json
    sqlweave enrolled.toml --execute --database-url sqlite://moodle.db")]
struct Cli {
    /// Query definition file (TOML)
    definition: Option<PathBuf>,

    /// Dialect to compile for (defaults to the configured one)
    #[arg(short, long, value_enum)]
    dialect: Option<DialectArg>,

    /// Render values inline instead of binding them
    #[arg(long)]
    inline: bool,

    /// Execute the query and print the rows
    #[arg(short, long)]
    execute: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Database connection URL
    #[arg(long, env = "SQLWEAVE_DATABASE_URL")]
    database_url: Option<String>,

    /// Table prefix applied to {table} placeholders
    #[arg(long)]
    prefix: Option<String>,

    /// Configuration file (defaults to <config dir>/sqlweave/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Generic,
    Postgres,
    Mysql,
    Sqlite,
    Sqlserver,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Generic => Dialect::Generic,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Sqlserver => Dialect::SqlServer,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the accepted comparison operators
    Operators,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "sqlweave=debug" } else { "sqlweave=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => match &cli.definition {
            Some(path) => run(path, &cli).await,
            None => {
                println!("{}", "sqlweave: composable SELECT queries".cyan().bold());
                println!();
                println!("Usage: sqlweave <DEFINITION> [OPTIONS]");
                println!();
                println!("Try: sqlweave --help");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.table_prefix = prefix.clone();
    }
    if let Some(dialect) = cli.dialect {
        config.dialect = Some(dialect.into());
    }
    config.validate()?;
    Ok(config)
}

async fn run(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let def = QueryDef::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?;
    let query = def.to_query()?;
    let config = load_config(cli)?;

    if cli.verbose {
        println!("{} {}", "Definition:".dimmed(), path.display().to_string().yellow());
    }

    if !cli.execute {
        let dialect = config.resolved_dialect();
        if cli.inline {
            print_sql(&query.to_sql_with(dialect), &[], &cli.format);
        } else {
            let compiled = query.compile_with(dialect);
            print_sql(&compiled.sql, &compiled.params, &cli.format);
        }
        return Ok(());
    }

    if cli.inline {
        bail!("--inline cannot be combined with --execute");
    }
    if cli.verbose {
        println!("{} {}", "Connecting to:".dimmed(), config.database_url);
    }
    let db = SqlxExecutor::from_config(&config).await?;
    let rows = query.get(&db).await?;
    format_output(&rows, &cli.format);
    Ok(())
}

fn print_sql(sql: &str, params: &[Value], format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({ "sql": sql, "params": params });
            println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
        }
        OutputFormat::Table => {
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", sql.white());
            if !params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (i, p) in params.iter().enumerate() {
                    println!("  {} = {}", (i + 1).to_string().dimmed(), p.to_string().yellow());
                }
            }
        }
    }
}

fn format_output(rows: &[Record], format: &OutputFormat) {
    if rows.is_empty() {
        println!("{}", "(no rows)".dimmed());
        return;
    }
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).unwrap_or_default());
        }
        OutputFormat::Table => {
            let grid = RowGrid::new(rows);
            println!("{}", grid.header().white().bold());
            println!("{}", grid.rule().dimmed());
            for line in grid.lines() {
                println!("{}", line);
            }
            println!();
            println!("{} row(s)", rows.len().to_string().cyan());
        }
    }
}

/// Rows laid out as padded text cells. Columns are the sorted union of every
/// row's keys; a key missing from a row prints as an empty cell.
struct RowGrid {
    columns: Vec<String>,
    widths: Vec<usize>,
    cells: Vec<Vec<String>>,
}

impl RowGrid {
    fn new(rows: &[Record]) -> Self {
        let columns: Vec<String> = rows
            .iter()
            .flat_map(|r| r.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.get(c).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();
        let widths = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .fold(c.chars().count(), usize::max)
            })
            .collect();
        Self {
            columns,
            widths,
            cells,
        }
    }

    fn pad(&self, values: &[String]) -> String {
        values
            .iter()
            .zip(&self.widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect::<Vec<_>>()
            .join(" │ ")
    }

    fn header(&self) -> String {
        self.pad(&self.columns)
    }

    fn rule(&self) -> String {
        self.widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─")
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.iter().map(|row| self.pad(row))
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn show_operators() {
    println!("{}", "Comparison operators".cyan().bold());
    println!();

    let operators = [
        ("=", "Equal"),
        ("<>, !=", "Not equal"),
        (">", "Greater than"),
        (">=", "Greater than or equal"),
        ("<", "Less than"),
        ("<=", "Less than or equal"),
        ("LIKE", "Pattern match"),
        ("NOT LIKE", "Negated pattern match"),
        ("ILIKE", "Case-insensitive pattern match"),
        ("NOT ILIKE", "Negated case-insensitive pattern match"),
    ];

    println!("{:12} {}", "Token".white().bold(), "Meaning".white().bold());
    println!("{}", "─".repeat(50).dimmed());
    for (token, meaning) in operators {
        println!("{:12} {}", token.yellow().bold(), meaning.white());
    }
    println!();
    println!("{}", "Tokens are case-insensitive.".dimmed());
}
