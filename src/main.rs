//! websift - extract tabular data from web documents

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use websift::{Error, InputFormat, Row, SelectionPath, TransformTemplate};

#[derive(Parser)]
#[command(name = "websift")]
#[command(version, about = "Extract tabular data from web documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    websift https://example.org/defs.html --match dl --column dt --column dd
    websift page.html --template table.xml
    websift https://example.org/api/items.json --format json
    websift export.csv --format csv")]
struct Cli {
    /// URL (http/https) or local file to read
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Template file (XML form: <table match="..."><column select="..."/></table>)
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["match_expr", "columns"])]
    template: Option<String>,

    /// Top-level selection path matching context nodes
    #[arg(long = "match", value_name = "PATH")]
    match_expr: Option<String>,

    /// Column as LABEL=PATH (or just PATH); repeatable, order preserved
    #[arg(long = "column", value_name = "LABEL=PATH")]
    columns: Vec<String>,

    /// Output field separator
    #[arg(long, default_value_t = ',')]
    sep: char,

    /// Fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Suppress the header line
    #[arg(long)]
    no_header: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Xml,
    Json,
    Csv,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> websift::Result<()> {
    let bytes = load_source(&cli.source, Duration::from_secs(cli.timeout))?;

    let rows = match cli.format {
        Format::Html => websift::extract_rows(&bytes, InputFormat::Html, &build_template(cli)?)?,
        Format::Xml => websift::extract_rows(&bytes, InputFormat::Xml, &build_template(cli)?)?,
        Format::Json => {
            let text = String::from_utf8_lossy(&bytes);
            json_rows(&websift::json::records(&text)?)
        }
        Format::Csv => {
            let text = String::from_utf8_lossy(&bytes);
            websift::csv::records(&text, cli.sep)
        }
    };

    write_rows(&rows, cli.sep, cli.no_header)?;
    Ok(())
}

fn load_source(source: &str, timeout: Duration) -> websift::Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(websift::fetch(source, timeout)?.bytes)
    } else {
        Ok(std::fs::read(source)?)
    }
}

fn build_template(cli: &Cli) -> websift::Result<TransformTemplate> {
    if let Some(path) = &cli.template {
        let text = std::fs::read_to_string(path)?;
        return TransformTemplate::from_xml(&text);
    }

    let Some(match_expr) = &cli.match_expr else {
        return Err(Error::Template(
            "no template given: use --template FILE or --match with --column".into(),
        ));
    };
    if cli.columns.is_empty() {
        return Err(Error::Template(
            "at least one --column is required with --match".into(),
        ));
    }

    let mut template = TransformTemplate::new(SelectionPath::parse(match_expr)?);
    for column in &cli.columns {
        let (label, path) = match column.split_once('=') {
            Some((label, path)) => (label, path),
            None => (column.as_str(), column.as_str()),
        };
        template = template.with_column(label, SelectionPath::parse(path)?);
    }
    Ok(template)
}

/// Flatten JSON records into display rows: labels come from the first
/// record, string values print bare, everything else prints as JSON.
fn json_rows(records: &[websift::json::JsonRecord]) -> Vec<Row> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let labels: Vec<String> = first.keys().cloned().collect();

    records
        .iter()
        .map(|record| {
            Row::new(
                labels
                    .iter()
                    .map(|label| {
                        let value = match record.get(label) {
                            Some(serde_json::Value::String(s)) => s.clone(),
                            Some(serde_json::Value::Null) | None => String::new(),
                            Some(other) => other.to_string(),
                        };
                        (label.clone(), value)
                    })
                    .collect(),
            )
        })
        .collect()
}

fn write_rows(rows: &[Row], sep: char, no_header: bool) -> websift::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(first) = rows.first()
        && !no_header
    {
        let labels: Vec<&str> = first.labels().collect();
        websift::csv::write_row(&mut out, &labels, sep)?;
    }
    for row in rows {
        let values: Vec<&str> = row.values().collect();
        websift::csv::write_row(&mut out, &values, sep)?;
    }
    out.flush()?;
    Ok(())
}
