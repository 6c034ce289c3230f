//! Build orchestration across files
//!
//! Ties the pipeline to its collaborators: inline each source, write the
//! destination file, then optionally run the Litmus and email-test steps on
//! the produced HTML. Files are processed sequentially; independent
//! invocations share no state.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::BuildConfig;
use crate::inliner::{Source, inline_css};
use crate::litmus::LitmusClient;
use crate::mailer::{DispatchOutcome, Mailer};

/// One source/destination pair to build.
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub src: PathBuf,
    pub dest: PathBuf,
}

impl BuildJob {
    #[must_use]
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }
}

/// What happened to one job.
#[derive(Debug)]
pub struct BuildReport {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Litmus response body, when that collaborator is enabled.
    pub litmus: Option<String>,
    /// Test-email outcome, when that collaborator is enabled.
    pub dispatch: Option<DispatchOutcome>,
}

pub struct EmailBuilder {
    config: BuildConfig,
}

impl EmailBuilder {
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run the inlining pipeline for one source.
    pub async fn inline(&self, source: &Source) -> crate::inliner::InlineResult<Vec<u8>> {
        inline_css(source, &self.config).await
    }

    /// Build every job: inline, write the destination, then hand the HTML to
    /// the enabled collaborators. The Litmus subject-duplicate counter lives
    /// for the duration of this call.
    pub async fn run(&self, jobs: &[BuildJob]) -> Result<Vec<BuildReport>> {
        let mut litmus = self.config.litmus().cloned().map(LitmusClient::new);
        let mailer = match self.config.email_test() {
            Some(email_test) => Some(Mailer::new(email_test.clone())?),
            None => None,
        };

        let mut reports = Vec::with_capacity(jobs.len());
        for job in jobs {
            log::info!("Building {} -> {}", job.src.display(), job.dest.display());

            let bytes = inline_css(&Source::Path(job.src.clone()), &self.config)
                .await
                .with_context(|| format!("Failed to build {}", job.src.display()))?;

            if let Some(parent) = job.dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(&job.dest, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", job.dest.display()))?;

            let html = String::from_utf8_lossy(&bytes).into_owned();

            let litmus_report = match &mut litmus {
                Some(client) => {
                    let subject = client.subject_for(&html);
                    Some(client.run(&html, &subject).await?)
                }
                None => None,
            };

            let dispatch = match &mailer {
                Some(mailer) => Some(mailer.send(&html, "").await?),
                None => None,
            };

            reports.push(BuildReport {
                src: job.src.clone(),
                dest: job.dest.clone(),
                litmus: litmus_report,
                dispatch,
            });
        }

        Ok(reports)
    }
}
