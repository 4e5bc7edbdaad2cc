use crate::OrgChartView;
use crate::config::load_config;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::model::OrgChart;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::visibility::Tab;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgchart", version, about = "Lay out an org chart and print the result as JSON")]
pub struct Args {
    /// Org unit list (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Layout dump file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Persisted UI state file; expansion changes are written back to it
    #[arg(short = 's', long = "stateFile")]
    pub state: Option<PathBuf>,

    /// Tab to show: 'all' or a department id
    #[arg(short = 't', long = "tab", default_value = "all")]
    pub tab: String,

    /// Department ids to toggle, in order (accordion semantics)
    #[arg(long = "toggle")]
    pub toggle: Vec<String>,

    /// Expand or collapse every department before anything else
    #[arg(long = "expandAll", conflicts_with = "collapse_all")]
    pub expand_all: bool,

    #[arg(long = "collapseAll")]
    pub collapse_all: bool,

    /// Search query; matching departments are expanded
    #[arg(short = 'q', long = "search")]
    pub search: Option<String>,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref()).context("failed to load config")?;
    let input = read_input(args.input.as_deref())?;
    let chart = OrgChart::from_json(&input).context("invalid org unit list")?;

    let store: Box<dyn KeyValueStore> = match args.state.as_deref() {
        Some(path) => Box::new(
            JsonFileStore::open(path)
                .with_context(|| format!("failed to open state file {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    let mut view = OrgChartView::new(chart, store, config);

    if args.expand_all {
        view.expand_all();
    } else if args.collapse_all {
        view.collapse_all();
    }
    for id in &args.toggle {
        view.toggle_department(id)?;
    }
    view.set_tab(Tab::from_token(&args.tab))?;
    if let Some(query) = args.search.as_deref() {
        view.search(query);
    }

    let graph = view.graph()?;
    let layout = view.layout()?;
    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout, &graph, view.search_matches())?,
        None => {
            let dump = LayoutDump::from_layout(&layout, &graph, view.search_matches());
            serde_json::to_writer_pretty(io::stdout().lock(), &dump)?;
            println!();
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "orgchart",
            "-i",
            "units.json",
            "--toggle",
            "eng",
            "--toggle",
            "ops",
            "-q",
            "amy",
            "--collapseAll",
        ])
        .unwrap();
        assert_eq!(args.toggle, vec!["eng", "ops"]);
        assert_eq!(args.search.as_deref(), Some("amy"));
        assert!(args.collapse_all);
        assert_eq!(args.tab, "all");
    }

    #[test]
    fn expand_and_collapse_conflict() {
        assert!(Args::try_parse_from(["orgchart", "--expandAll", "--collapseAll"]).is_err());
    }

    #[test]
    fn reads_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.json");
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "[]");
        assert!(read_input(Some(&dir.path().join("missing.json"))).is_err());
    }
}
