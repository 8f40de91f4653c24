//! Command-line interface for the BOIB harvester.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use boib_core::{DateQuery, DocumentFormat, QueryError};
use boib_engine::{
    BulletinExtractor, DownloadPipeline, FetchSettings, Fetcher, LocalFsSink, ObjectStoreSink,
    ReqwestFetcher, S3Settings, SiteConfig, StorageSink, CAIB_BASE_DOMAIN,
};
use boib_logging::{boib_info, LogSettings};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::display;

/// Harvest bulletins, sections and articles from the BOIB.
#[derive(Debug, Parser)]
#[command(name = "boib")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Also write log records to this file
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Base domain of the bulletin site
    #[arg(long, env = "BOIB_BASE_URL", default_value = CAIB_BASE_DOMAIN, global = true)]
    pub base_url: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List today's bulletins.
    Today {
        /// Print JSON instead of the text listing
        #[arg(long)]
        json: bool,
    },
    /// List the bulletins of a year, month or day.
    Fetch {
        #[command(flatten)]
        date: DateArgs,

        /// Print JSON instead of the text listing
        #[arg(long)]
        json: bool,
    },
    /// Extract bulletins and store their article documents.
    Download {
        #[command(flatten)]
        date: DateArgs,

        #[command(flatten)]
        target: TargetArgs,

        /// Formats to try per article, in order of preference
        #[arg(long, value_delimiter = ',', default_value = "pdf,html", value_parser = parse_format)]
        formats: Vec<DocumentFormat>,
    },
}

#[derive(Debug, Args)]
pub struct DateArgs {
    /// Publication year
    pub year: i32,
    /// Month (1-12)
    pub month: Option<u32>,
    /// Day of month; requires a month
    pub day: Option<u32>,
}

impl DateArgs {
    pub fn query(&self) -> Result<DateQuery, QueryError> {
        DateQuery::new(self.year, self.month, self.day)
    }
}

/// Where downloaded documents go: a local directory or an S3-compatible bucket.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Local directory receiving the documents
    #[arg(
        long,
        env = "BOIB_OUTPUT_DIR",
        conflicts_with = "bucket",
        required_unless_present = "bucket"
    )]
    pub output_dir: Option<PathBuf>,

    /// Object storage bucket receiving the documents
    #[arg(long, env = "BOIB_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket
    #[arg(long, env = "BOIB_PREFIX", requires = "bucket")]
    pub prefix: Option<String>,

    /// Bucket region (defaults to AWS_REGION)
    #[arg(long, requires = "bucket")]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint
    #[arg(long, requires = "bucket")]
    pub endpoint: Option<String>,
}

impl TargetArgs {
    pub fn s3_settings(&self) -> Option<S3Settings> {
        self.bucket.as_ref().map(|bucket| S3Settings {
            bucket: bucket.clone(),
            prefix: self.prefix.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            ..S3Settings::default()
        })
    }

    fn sink(&self) -> Result<Arc<dyn StorageSink>> {
        if let Some(settings) = self.s3_settings() {
            let sink = ObjectStoreSink::from_s3(&settings)
                .with_context(|| format!("configuring bucket {}", settings.bucket))?;
            return Ok(Arc::new(sink));
        }
        match self.output_dir.as_ref() {
            Some(dir) => Ok(Arc::new(LocalFsSink::new(dir))),
            None => bail!("either --output-dir or --bucket is required"),
        }
    }
}

fn parse_format(raw: &str) -> Result<DocumentFormat, String> {
    DocumentFormat::from_extension(raw)
        .ok_or_else(|| format!("unknown format `{raw}` (expected pdf or html)"))
}

impl Cli {
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            file: self.log_file.clone(),
            ..LogSettings::default()
        }
        .with_verbosity(self.verbose, self.quiet)
    }
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let site = SiteConfig::parse(&cli.base_url)
        .with_context(|| format!("invalid base url {}", cli.base_url))?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let extractor = BulletinExtractor::new(fetcher.clone(), site);

    match cli.command {
        Commands::Today { json } => {
            let bulletins = extractor
                .extract_today()
                .await
                .context("extracting today's bulletins")?;
            print_bulletins(&bulletins, json)
        }
        Commands::Fetch { date, json } => {
            let query = date.query()?;
            let bulletins = extractor
                .extract(&query)
                .await
                .with_context(|| format!("extracting bulletins for {query}"))?;
            print_bulletins(&bulletins, json)
        }
        Commands::Download {
            date,
            target,
            formats,
        } => {
            let query = date.query()?;
            let sink = target.sink()?;
            let bulletins = extractor
                .extract(&query)
                .await
                .with_context(|| format!("extracting bulletins for {query}"))?;
            boib_info!("{} bulletins extracted for {}", bulletins.len(), query);

            let pipeline = DownloadPipeline::new(fetcher, sink, &formats);
            let report = pipeline
                .download_all(&bulletins)
                .await
                .context("storing documents")?;
            print!("{}", display::render_report(&report));
            Ok(())
        }
    }
}

fn print_bulletins(bulletins: &[boib_core::Bulletin], json: bool) -> Result<()> {
    if json {
        println!("{}", display::render_json(bulletins)?);
    } else {
        print!("{}", display::render_listing(bulletins));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_fetch_with_month() {
        let cli = Cli::parse_from(["boib", "fetch", "2024", "3"]);
        let Commands::Fetch { date, json } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!((date.year, date.month, date.day), (2024, Some(3), None));
        assert!(!json);
        assert_eq!(date.query().unwrap(), DateQuery::month(2024, 3).unwrap());
    }

    #[test]
    fn day_without_month_is_not_expressible() {
        let cli = Cli::parse_from(["boib", "fetch", "2024", "3", "5"]);
        let Commands::Fetch { date, .. } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(date.query().unwrap(), DateQuery::day(2024, 3, 5).unwrap());

        let invalid = DateArgs {
            year: 2024,
            month: None,
            day: Some(5),
        };
        assert!(invalid.query().is_err());
    }

    #[test]
    fn download_formats_keep_their_order() {
        let cli = Cli::parse_from([
            "boib",
            "download",
            "2024",
            "--output-dir",
            "out",
            "--formats",
            "html,pdf",
        ]);
        let Commands::Download {
            target, formats, ..
        } = cli.command
        else {
            panic!("expected download");
        };
        assert_eq!(formats, vec![DocumentFormat::Html, DocumentFormat::Pdf]);
        assert_eq!(target.output_dir, Some(PathBuf::from("out")));
        assert!(target.s3_settings().is_none());
    }

    #[test]
    fn download_defaults_to_pdf_then_html() {
        let cli = Cli::parse_from(["boib", "download", "2024", "--output-dir", "out"]);
        let Commands::Download { formats, .. } = cli.command else {
            panic!("expected download");
        };
        assert_eq!(formats, vec![DocumentFormat::Pdf, DocumentFormat::Html]);
    }

    #[test]
    fn bucket_target_builds_s3_settings() {
        let cli = Cli::parse_from([
            "boib",
            "download",
            "2024",
            "--bucket",
            "gazettes",
            "--prefix",
            "boib",
            "--endpoint",
            "http://localhost:9000",
        ]);
        let Commands::Download { target, .. } = cli.command else {
            panic!("expected download");
        };
        let settings = target.s3_settings().unwrap();
        assert_eq!(settings.bucket, "gazettes");
        assert_eq!(settings.prefix.as_deref(), Some("boib"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from([
            "boib",
            "download",
            "2024",
            "--output-dir",
            "out",
            "--formats",
            "docx",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_flags_pick_the_level() {
        let cli = Cli::parse_from(["boib", "-vv", "today"]);
        assert_eq!(cli.log_settings().level, log::LevelFilter::Trace);

        let cli = Cli::parse_from(["boib", "today", "-q"]);
        assert_eq!(cli.log_settings().level, log::LevelFilter::Warn);
    }
}
