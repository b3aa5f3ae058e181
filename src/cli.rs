// src/cli.rs
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::config::{Config, ExtractOptions};
use crate::core::Transport;
use crate::error::Result;
use crate::models::Tabular;
use crate::session::Session;
use crate::specs;

#[derive(Debug, Parser)]
#[command(name = "librus", version, about = "Export records from the Librus Synergia portal")]
pub struct Cli {
    #[command(subcommand)]
    pub page: PageKind,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Skip unrecognized labels and unreadable cells instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Leave out the header row.
    #[arg(long)]
    pub no_headers: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
pub enum PageKind {
    Announcements,
    Grades,
    Semesters,
    Exams,
    Absences,
    Schedule,
    Messages {
        /// Fetch every message body (one extra request each).
        #[arg(long)]
        with_content: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
}

impl Format {
    pub fn delim(&self) -> u8 {
        match self {
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }
}

/// Parse args, log in from the environment (`.env` honoured) and export one page.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let options = if cli.lenient { ExtractOptions::lenient() } else { ExtractOptions::default() };
    info!(uri_base = %config.uri_base, page = ?cli.page, "connecting");
    let session = Session::connect(&config, options)?;

    let sink: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let written = export(&session, &cli, sink)?;
    info!(rows = written, "done");
    Ok(())
}

/// Fetch `cli.page` through `session` and write it as CSV/TSV. Returns the row count.
pub fn export<T: Transport, W: Write>(session: &Session<T>, cli: &Cli, sink: W) -> Result<usize> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(cli.format.delim())
        .flexible(false)
        .from_writer(sink);
    let headers = !cli.no_headers;

    let n = match cli.page {
        PageKind::Announcements => write_all(&mut out, headers, specs::announcements::fetch(session)?)?,
        PageKind::Grades => write_all(&mut out, headers, specs::grades::fetch(session)?)?,
        PageKind::Semesters => write_all(&mut out, headers, specs::semesters::fetch(session)?)?,
        PageKind::Exams => write_all(&mut out, headers, specs::exams::fetch(session)?.collect::<Result<Vec<_>>>()?)?,
        PageKind::Absences => {
            write_all(&mut out, headers, specs::absences::fetch(session)?.collect::<Result<Vec<_>>>()?)?
        }
        PageKind::Schedule => write_all(&mut out, headers, specs::schedule::fetch(session)?.lessons)?,
        PageKind::Messages { with_content } => {
            write_all(&mut out, headers, specs::messages::fetch(session, with_content)?)?
        }
    };

    out.flush()?;
    Ok(n)
}

fn write_all<R: Tabular, W: Write>(out: &mut csv::Writer<W>, headers: bool, records: Vec<R>) -> Result<usize> {
    if headers {
        out.write_record(R::headers())?;
    }
    for r in &records {
        out.write_record(r.row())?;
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OfflineTransport;
    use crate::config::consts::GRADES_PATH;

    #[test]
    fn parses_page_and_flags() {
        let cli = Cli::try_parse_from(["librus", "--format", "tsv", "--lenient", "messages", "--with-content"]).unwrap();
        assert_eq!(cli.format, Format::Tsv);
        assert!(cli.lenient);
        assert_eq!(cli.page, PageKind::Messages { with_content: true });
    }

    #[test]
    fn rejects_unknown_page() {
        assert!(Cli::try_parse_from(["librus", "homework"]).is_err());
    }

    #[test]
    fn exports_semesters_as_tsv() {
        let t = OfflineTransport::new().with_page(
            GRADES_PATH,
            "<table><tr><td></td><td>Fizyka</td><td>4 5</td><td>-</td><td>-</td>\
             <td>-</td><td>-</td><td>-</td><td>-</td><td>5</td></tr></table>",
        );
        let session = Session::new(&t, ExtractOptions::default());
        let cli = Cli::try_parse_from(["librus", "--format", "tsv", "semesters"]).unwrap();

        let mut buf = Vec::new();
        let n = export(&session, &cli, &mut buf).unwrap();
        assert_eq!(n, 1);
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Subject\tSemester 1\t"));
        assert_eq!(lines.next().unwrap(), "Fizyka\t4 5\t\t\t\t\t\t\t5");
    }
}
