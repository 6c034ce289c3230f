// mailforge: inline CSS into HTML email templates.
//
// Reads one or more HTML files, folds their stylesheets into inline style
// attributes and writes the results to the output directory. Litmus and
// test-email collaborators are enabled through a JSON config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mailforge::{BuildConfig, BuildJob, EmailBuilder};

#[derive(Parser, Debug)]
#[command(name = "mailforge", version, about = "Inline CSS into HTML email templates")]
struct Cli {
    /// HTML files to build
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory the built files are written to
    #[arg(short = 'o', long, default_value = "dist")]
    out_dir: PathBuf,

    /// Extra CSS appended last in the cascade (highest priority at equal
    /// specificity)
    #[arg(long)]
    extra_css: Option<String>,

    /// Base path or URL for resolving external stylesheets
    #[arg(long)]
    relative_path: Option<String>,

    /// Escape non-ASCII output characters as numeric references
    #[arg(long)]
    encode: bool,

    /// JSON config file (litmus / email-test collaborators, defaults for the
    /// flags above)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config_and_jobs(self) -> Result<(BuildConfig, Vec<BuildJob>)> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str::<BuildConfig>(&raw)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => BuildConfig::default(),
        };

        // Flags override the config file.
        let mut builder = BuildConfig::builder()
            .encode_special_chars(self.encode || config.encode_special_chars())
            .parse_options(config.parse().clone());
        if let Some(extra_css) = self.extra_css.as_deref().or({
            let css = config.extra_css();
            (!css.is_empty()).then_some(css)
        }) {
            builder = builder.extra_css(extra_css);
        }
        if let Some(base) = self.relative_path.as_deref().or(config.relative_path()) {
            builder = builder.relative_path(base);
        }
        if let Some(litmus) = config.litmus() {
            builder = builder.litmus(litmus.clone());
        }
        if let Some(email_test) = config.email_test() {
            builder = builder.email_test(email_test.clone());
        }
        config = builder.build();

        let jobs = self
            .files
            .iter()
            .map(|src| {
                let name = src
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("out.html"));
                BuildJob::new(src.clone(), self.out_dir.join(name))
            })
            .collect();

        Ok((config, jobs))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let (config, jobs) = cli.into_config_and_jobs()?;

    let builder = EmailBuilder::new(config);
    let reports = builder.run(&jobs).await?;

    for report in &reports {
        println!("built {} -> {}", report.src.display(), report.dest.display());
        if let Some(outcome) = report.dispatch {
            println!("  test email: {outcome}");
        }
        if report.litmus.is_some() {
            println!("  litmus test submitted");
        }
    }

    Ok(())
}
