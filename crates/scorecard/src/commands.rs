//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use scorecard_api::{ApiConfig, AppState};
use scorecard_models::calendar::month_name;
use scorecard_persistence::{seed_defaults, PlanStore};
use scorecard_planner::export::{to_csv, to_json, to_svg_pages};
use scorecard_planner::{
    ApiClient, EditorConfig, ExportFormat, GanttEditor, MonthSpan, TimeAxis, ROWS_PER_PAGE,
};

use crate::cli::{Cli, Commands, EdgeArg};
use crate::config::numbered_path;
use crate::error::{CliError, Result};

/// Runs the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir();
    let planning_year = cli.planning_year;

    match cli.command {
        Commands::Serve {
            host,
            port,
            cors_origins,
            no_seed,
        } => serve(&data_dir, planning_year, host, port, cors_origins, no_seed).await,
        Commands::Seed => seed(&data_dir),
        Commands::Export {
            format,
            output,
            api_url,
        } => export(&api_url, format.into(), output).await,
        Commands::Reschedule {
            code,
            by,
            edge,
            api_url,
        } => reschedule(&api_url, planning_year, &code, by, edge).await,
    }
}

async fn serve(
    data_dir: &Path,
    planning_year: i32,
    host: String,
    port: u16,
    cors_origins: Vec<String>,
    no_seed: bool,
) -> Result<()> {
    let store = PlanStore::open(data_dir)?.with_planning_year(planning_year);
    if !no_seed && store.is_empty()? {
        let report = seed_defaults(&store)?;
        info!(
            perspectives = report.perspectives,
            initiatives = report.initiatives,
            "seeded empty store"
        );
    }

    let mut config = ApiConfig::new(host, port);
    if !cors_origins.is_empty() {
        config = config.with_cors_origins(cors_origins);
    }
    println!("Serving {} on http://{}/api", store.path().display(), config.bind_address());
    let state = AppState::new(config.clone(), store);
    scorecard_api::serve(config, state).await?;
    Ok(())
}

fn seed(data_dir: &Path) -> Result<()> {
    let store = PlanStore::open(data_dir)?;
    let report = seed_defaults(&store)?;
    println!(
        "Added {} perspective(s) and {} initiative(s) to {}",
        report.perspectives,
        report.initiatives,
        store.path().display()
    );
    Ok(())
}

async fn export(api_url: &str, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let client = ApiClient::new(api_url);
    let data = client.gantt_data().await?;
    let output = output.unwrap_or_else(|| {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        PathBuf::from(format.default_file_name(&today))
    });

    match format {
        ExportFormat::Json => write_file(&output, &to_json(&data)?)?,
        ExportFormat::Csv => write_file(&output, &to_csv(&data))?,
        ExportFormat::Svg => {
            let pages = to_svg_pages(&data, &TimeAxis::default(), ROWS_PER_PAGE);
            if pages.len() == 1 {
                write_file(&output, &pages[0])?;
            } else {
                for (index, page) in pages.iter().enumerate() {
                    write_file(&numbered_path(&output, index + 1), page)?;
                }
            }
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Grid x of the point a user would grab to drag `span`: a handle for an
/// edge, otherwise the middle of the bar.
pub fn grab_point(axis: &TimeAxis, handle_width: f64, span: MonthSpan, edge: Option<EdgeArg>) -> f64 {
    let (left, right) = axis.bar_extent(span.start, span.end);
    let offset = match edge {
        Some(EdgeArg::Start) => left + handle_width / 2.0,
        Some(EdgeArg::End) => right - handle_width / 2.0,
        None => (left + right) / 2.0,
    };
    axis.label_width + offset
}

async fn reschedule(
    api_url: &str,
    planning_year: i32,
    code: &str,
    by: i64,
    edge: Option<EdgeArg>,
) -> Result<()> {
    let config = EditorConfig::default().with_planning_year(planning_year);
    let mut editor = GanttEditor::new(Arc::new(ApiClient::new(api_url)), config);
    editor.load().await?;

    let id = editor
        .find_by_code(code)
        .map(|i| i.initiative.id.clone())
        .ok_or_else(|| CliError::Usage(format!("No initiative with code {}", code)))?;
    let span = editor
        .span_of(&id)
        .ok_or_else(|| CliError::Usage(format!("Initiative {} has no schedule", code)))?;

    let x = grab_point(editor.axis(), editor.config().handle_width, span, edge);
    if editor.pointer_down(&id, x)?.is_none() {
        return Err(CliError::Usage(format!("Could not grab the bar of {}", code)));
    }
    let moved = editor.pointer_move(x + by as f64 * editor.config().cell_width)?;
    editor.pointer_up();

    if moved.is_none() {
        warn!(code, by, "drag left the schedule unchanged");
        println!("{} unchanged", code);
        return Ok(());
    }
    editor.flush(&id).await?;
    for note in editor.poll_events() {
        println!("{}", note);
    }
    if let Some(span) = editor.span_of(&id) {
        println!(
            "{}: {} - {}",
            code,
            month_name(span.start).unwrap_or("?"),
            month_name(span.end).unwrap_or("?")
        );
    }
    Ok(())
}
