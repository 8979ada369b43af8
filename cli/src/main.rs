//! AcademicWorld CLI: command-line access to the dashboard widgets
//!
//! Uses the academicworld-sdk RemoteClient to connect to a running server,
//! or the EmbeddedClient over the sample dataset with `--embedded`.

use academicworld_sdk::{
    DashboardClient, EmbeddedClient, FavoritesSnapshot, PieChart, RecommendationEntry,
    RemoteClient, TableView, Transition, TransitionKind, YearRange,
};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "academicworld", version, about = "AcademicWorld Explorer CLI")]
struct Cli {
    /// Server HTTP URL
    #[arg(long, default_value = "http://localhost:8050", global = true, env = "ACADEMICWORLD_URL")]
    url: String,

    /// Query the bundled sample dataset in-process instead of a server
    #[arg(long, global = true)]
    embedded: bool,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args, Clone, Copy)]
struct RangeArgs {
    /// First year, inclusive
    #[arg(long)]
    start: Option<i32>,
    /// Last year, inclusive
    #[arg(long)]
    end: Option<i32>,
}

impl RangeArgs {
    fn range(self) -> YearRange {
        YearRange::from_bounds(self.start, self.end)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Top 10 keywords by publication count
    TopKeywords {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Top 10 universities for a keyword
    TopUniversities {
        keyword: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Top 10 keyword interest scores of a university
    UniversityKeywords { university: String },
    /// Citation-weighted keyword scores of a faculty member
    FacultyKeywords {
        faculty: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// List dropdown choices
    Options,
    /// Favorite keywords and recommendations
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Get server status
    Status,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Show favorites and recommendations (default)
    List,
    /// Add a keyword to favorites
    Add { keyword: String },
    /// Remove a keyword from favorites
    Remove { keyword: String },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client: Box<dyn DashboardClient> = if cli.embedded {
        Box::new(EmbeddedClient::with_sample_data().await)
    } else {
        Box::new(RemoteClient::new(&cli.url))
    };

    if let Err(e) = run(client.as_ref(), cli.command, &cli.format).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(client: &dyn DashboardClient, command: Commands, format: &OutputFormat) -> CliResult {
    match command {
        Commands::TopKeywords { range } => {
            print_table(&client.top_keywords(range.range()).await?, format)
        }
        Commands::TopUniversities { keyword, range } => {
            print_table(&client.top_universities(&keyword, range.range()).await?, format)
        }
        Commands::UniversityKeywords { university } => {
            print_pie(&client.university_keyword_scores(&university).await?, format)
        }
        Commands::FacultyKeywords { faculty, range } => print_table(
            &client.faculty_keyword_scores(&faculty, range.range()).await?,
            format,
        ),
        Commands::Options => {
            let options = client.options().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
                _ => {
                    for (title, values) in [
                        ("Keywords", &options.keywords),
                        ("Universities", &options.universities),
                        ("Faculty", &options.faculty),
                    ] {
                        print_table(&single_column(title, values, options.degraded), format)?;
                    }
                }
            }
            Ok(())
        }
        Commands::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => print_snapshot(&client.favorites().await?, format),
            FavoritesAction::Add { keyword } => {
                print_transition(&client.add_favorite(&keyword).await?, format)
            }
            FavoritesAction::Remove { keyword } => {
                print_transition(&client.remove_favorite(&keyword).await?, format)
            }
        },
        Commands::Status => {
            let status = client.status().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                _ => {
                    println!("Status:  {}", status.status);
                    println!("Version: {}", status.version);
                }
            }
            Ok(())
        }
    }
}

fn single_column(title: &str, values: &[String], degraded: bool) -> TableView {
    TableView {
        columns: vec![title.to_string()],
        records: values.iter().map(|v| vec![json!(v)]).collect(),
        degraded,
    }
}

fn recommendation_view(label: &str, entries: &[RecommendationEntry], degraded: bool) -> TableView {
    TableView {
        columns: vec![label.to_string(), "Keyword Count".to_string(), "Score".to_string()],
        records: entries
            .iter()
            .map(|e| vec![json!(e.name), json!(e.keyword_count), json!(e.score)])
            .collect(),
        degraded,
    }
}

fn print_table(view: &TableView, format: &OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(view)?);
        }
        OutputFormat::Csv => {
            println!("{}", view.columns.join(","));
            for row in &view.records {
                let cells: Vec<String> = row.iter().map(format_csv_value).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&view.columns);

            for row in &view.records {
                let cells: Vec<String> = row.iter().map(format_table_value).collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", view.records.len());
        }
    }
    if view.degraded {
        eprintln!("warning: data source unavailable, results may be incomplete");
    }
    Ok(())
}

fn print_pie(pie: &PieChart, format: &OutputFormat) -> CliResult {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(pie)?);
        return Ok(());
    }

    let total: f64 = pie.values.iter().sum();
    let view = TableView {
        columns: vec!["Keyword".to_string(), "Score".to_string(), "Share".to_string()],
        records: pie
            .labels
            .iter()
            .zip(&pie.values)
            .map(|(label, value)| {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                vec![json!(label), json!(value), json!(format!("{:.1}%", share))]
            })
            .collect(),
        degraded: pie.degraded,
    };
    if let OutputFormat::Table = format {
        println!("{}", pie.title);
    }
    print_table(&view, format)
}

fn print_snapshot(snapshot: &FavoritesSnapshot, format: &OutputFormat) -> CliResult {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    print_table(
        &single_column("Favorite Keywords", &snapshot.favorites, false),
        format,
    )?;
    print_table(
        &recommendation_view("Faculty", &snapshot.top_faculty, snapshot.degraded),
        format,
    )?;
    print_table(
        &recommendation_view("University", &snapshot.top_universities, snapshot.degraded),
        format,
    )
}

fn print_transition(transition: &Transition, format: &OutputFormat) -> CliResult {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(transition)?);
        return Ok(());
    }

    eprintln!("{}", describe_change(&transition.change));
    print_snapshot(&transition.snapshot, format)
}

fn describe_change(change: &TransitionKind) -> String {
    match change {
        TransitionKind::Added { keyword } => format!("Added {:?}", keyword),
        TransitionKind::Removed { keyword } => format!("Removed {:?}", keyword),
        TransitionKind::Refreshed => "Refreshed".to_string(),
        TransitionKind::Unchanged { reason } => format!("Unchanged ({:?})", reason),
    }
}

fn format_table_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => format!("{:.2}", f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn format_csv_value(v: &Value) -> String {
    match v {
        Value::Null => "".to_string(),
        Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            let json = serde_json::to_string(v).unwrap_or_default();
            format!("\"{}\"", json.replace('"', "\"\""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academicworld_sdk::NoOpReason;

    #[test]
    fn test_csv_quotes_separators() {
        assert_eq!(format_csv_value(&json!("a, b")), "\"a, b\"");
        assert_eq!(format_csv_value(&json!("say \"hi\"")), "\"say \"\"hi\"\"\"");
        assert_eq!(format_csv_value(&json!(3)), "3");
        assert_eq!(format_csv_value(&Value::Null), "");
    }

    #[test]
    fn test_table_rounds_scores() {
        assert_eq!(format_table_value(&json!(1.23456)), "1.23");
        assert_eq!(format_table_value(&json!(12)), "12");
        assert_eq!(format_table_value(&json!("databases")), "databases");
    }

    #[test]
    fn test_describe_change() {
        let change = TransitionKind::Unchanged { reason: NoOpReason::AlreadyFavorite };
        assert_eq!(describe_change(&change), "Unchanged (AlreadyFavorite)");
    }

    #[test]
    fn test_range_args_default_to_full_range() {
        let args = RangeArgs { start: None, end: Some(2000) };
        assert_eq!(args.range(), YearRange::new(YearRange::MIN_YEAR, 2000));
    }

    #[tokio::test]
    async fn test_run_against_embedded_client() {
        let client = EmbeddedClient::with_sample_data().await;
        let command = Commands::Favorites {
            action: Some(FavoritesAction::Add { keyword: "databases".to_string() }),
        };
        run(&client, command, &OutputFormat::Csv).await.unwrap();
        assert_eq!(client.favorites().await.unwrap().favorites, vec!["databases"]);
    }
}
