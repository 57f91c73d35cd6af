use anyhow::{Context, Result};
use clap::Parser;
use runclean_core::Config;
use runclean_ingestion::{TableReader, TableWriter};
use runclean_report::{render_preview, CleaningSummary};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "runclean")]
#[command(about = "Clean a manufacturing run-metrics export and report what was discarded")]
#[command(version)]
struct Cli {
    /// Raw comma-separated export.
    input: PathBuf,

    /// Where to write the cleaned table.
    #[arg(short, long, default_value = "cleaned_data.csv")]
    output: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of cleaned rows to preview (overrides the configuration).
    #[arg(long)]
    preview: Option<usize>,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let raw = TableReader::new(&config.input)?
        .read_path(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!(rows = raw.len(), columns = raw.headers.len(), "loaded input");

    let result = runclean_cleaning::clean(raw)
        .with_context(|| format!("cleaning {}", cli.input.display()))?;
    if !result.warnings().is_empty() {
        warn!(count = result.warnings().len(), "some values could not be parsed");
    }

    let summary = CleaningSummary::new(&result, config.report.ratio_decimals);
    if cli.json {
        writeln!(out, "{}", summary.to_json()?)?;
    } else {
        write!(out, "{summary}")?;
        let limit = cli.preview.unwrap_or(config.report.preview_rows);
        if limit > 0 {
            writeln!(out, "\nCleaned data:")?;
            write!(out, "{}", render_preview(&result, limit))?;
        }
    }

    TableWriter::new(&config.output)?
        .write_path(&cli.output, result.headers(), result.records())
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(path = %cli.output.display(), rows = result.records().len(), "wrote cleaned table");

    Ok(())
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "Informe semanal\n\
        Linea,Uds. fabricadas,Run Time,Tpo STD,Desv vs STD\n\
        L1,\"2,5\",2,2,\"5,5%\"\n\
        L1,0,2,2,5%\n\
        L2,2,2,2,\n";

    fn cli(dir: &tempfile::TempDir, extra: &[&str]) -> Cli {
        let input = dir.path().join("export.csv");
        std::fs::write(&input, EXPORT).unwrap();
        let output = dir.path().join("cleaned.csv");

        let mut args = vec![
            "runclean".to_string(),
            input.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::parse_from(args)
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&dir, &[]);
        let mut out = Vec::new();

        run(&cli, &mut out).unwrap();

        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.starts_with("Deleted rows: 66.67%\n"));
        assert!(stdout.contains("Deleted units produced: 44.44%"));
        assert!(stdout.contains("Cleaned data:"));

        let written = std::fs::read_to_string(&cli.output).unwrap();
        assert_eq!(
            written,
            "Linea;Uds. fabricadas;Run Time;Tpo STD;Desv vs STD\nL1;2,5;2,0;2,0;5.5%\n"
        );
    }

    #[test]
    fn test_json_summary() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(&dir, &["--json"]);
        let mut out = Vec::new();

        run(&cli, &mut out).unwrap();

        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.contains("\"rows_before\": 3"));
        assert!(!stdout.contains("Cleaned data:"));
    }

    #[test]
    fn test_float_passthrough_written_with_comma_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        std::fs::write(
            &input,
            "Informe\nEficiencia,Uds. fabricadas,Run Time,Tpo STD,Desv vs STD\n0.85,2,2,2,5%\n",
        )
        .unwrap();
        let output = dir.path().join("cleaned.csv");
        let cli = Cli::parse_from([
            "runclean".to_string(),
            input.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ]);

        run(&cli, &mut Vec::new()).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Eficiencia;Uds. fabricadas;Run Time;Tpo STD;Desv vs STD\n0,85;2,0;2,0;2,0;5.0%\n"
        );
    }

    #[test]
    fn test_missing_column_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "title\nUds. fabricadas,Run Time\n1,2\n").unwrap();
        let cli = Cli::parse_from([
            "runclean".to_string(),
            input.display().to_string(),
            "-o".to_string(),
            dir.path().join("out.csv").display().to_string(),
        ]);

        let err = run(&cli, &mut Vec::new()).unwrap_err();
        let root = err.root_cause().to_string();
        assert!(root.contains("Tpo STD"), "unexpected error: {root}");
        assert!(!dir.path().join("out.csv").exists());
    }
}
