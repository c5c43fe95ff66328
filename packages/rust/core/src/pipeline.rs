//! End-to-end generation pipeline: keyword list → synthesis → render → archive.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use pageforge_archive::{ArchiveWriter, FinishedArchive};
use pageforge_keywords::{normalize, title_case};
use pageforge_render::Renderer;
use pageforge_shared::{AppConfig, KeywordOutcome, RequestTemplate, Result, RunId};
use pageforge_synthesis::Synthesizer;

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

/// Configuration for a generation run — built once at run start, read-only
/// for the run's duration.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Generation parameters shared across all keywords.
    pub request: RequestTemplate,
    /// File name the finalized archive is offered under.
    pub archive_name: String,
    /// Write the JSON descriptor even when content generation failed,
    /// so downstream consumers can detect and backfill missing content.
    /// When disabled, a failed keyword is skipped entirely.
    pub descriptor_on_failure: bool,
    /// Minimum ms between synthesizer calls (0 disables the delay).
    pub rate_limit_ms: u64,
}

impl From<&AppConfig> for GenerateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            request: RequestTemplate::from(config),
            archive_name: config.defaults.archive_name.clone(),
            descriptor_on_failure: config.defaults.descriptor_on_failure,
            rate_limit_ms: config.defaults.rate_limit_ms,
        }
    }
}

/// Result of a completed generation run.
#[derive(Debug)]
pub struct GenerateResult {
    /// Run identifier.
    pub run_id: RunId,
    /// The finalized archive bytes plus per-entry metadata, in write order.
    pub archive: FinishedArchive,
    /// File name the archive should be offered under.
    pub archive_name: String,
    /// Per-keyword status log, in input order.
    pub outcomes: Vec<KeywordOutcome>,
    /// Total keywords processed.
    pub keywords_total: usize,
    /// Keywords whose HTML article was written.
    pub html_written: usize,
    /// Keywords whose JSON descriptor was written.
    pub descriptors_written: usize,
    /// Keywords whose slug collided with an earlier keyword's.
    pub slug_collisions: usize,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl GenerateResult {
    /// One-line, user-visible run status.
    pub fn summary(&self) -> String {
        format!(
            "archive available, {}/{} keywords had full content",
            self.html_written, self.keywords_total
        )
    }
}

/// Output of the archive-build loop, before the controller wraps it up.
#[derive(Debug)]
pub struct BuildOutput {
    /// The finalized archive.
    pub archive: FinishedArchive,
    /// Per-keyword status log, in input order.
    pub outcomes: Vec<KeywordOutcome>,
}

// ---------------------------------------------------------------------------
// Run state and progress reporting
// ---------------------------------------------------------------------------

/// Run controller state machine.
///
/// `Idle → Loading → Generating → Finalized` on success;
/// `Idle → Loading → Failed` when loading fails. Per-keyword failures never
/// leave `Generating` early; only an archive-level failure does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Generating,
    Finalized,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Generating => "generating",
            Self::Finalized => "finalized",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Progress callback for reporting run status.
///
/// Purely observational: implementations must not affect control flow.
pub trait ProgressReporter: Send + Sync {
    /// Called on each run-state transition.
    fn state(&self, state: RunState);
    /// Called once per keyword, after its artifacts are handled. `current`
    /// is 1-based; `current / total` is the fraction complete.
    fn keyword_processed(&self, current: usize, total: usize, message: &str);
    /// Called when the run completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn state(&self, _state: RunState) {}
    fn keyword_processed(&self, _current: usize, _total: usize, _message: &str) {}
    fn done(&self, _result: &GenerateResult) {}
}

// ---------------------------------------------------------------------------
// Archive builder
// ---------------------------------------------------------------------------

/// Build the archive for a keyword list.
///
/// Keywords are processed one at a time, in input order. A synthesis or
/// template failure is recorded in the keyword's outcome and never aborts
/// the loop; the JSON descriptor is written even for failed keywords unless
/// `descriptor_on_failure` is disabled. Archive write failures are fatal.
/// The archive is finalized exactly once, after the last keyword.
#[instrument(skip_all, fields(keywords = keywords.len()))]
pub async fn build_archive(
    keywords: &[String],
    config: &GenerateConfig,
    synthesizer: &dyn Synthesizer,
    renderer: &Renderer,
    progress: &dyn ProgressReporter,
) -> Result<BuildOutput> {
    let total = keywords.len();
    let mut writer = ArchiveWriter::new();
    let mut outcomes: Vec<KeywordOutcome> = Vec::with_capacity(total);
    let mut seen_slugs: HashSet<String> = HashSet::new();

    for (index, keyword) in keywords.iter().enumerate() {
        let position = index + 1;
        let slug = normalize(keyword);
        let display_keyword = title_case(keyword);

        let slug_collision = !seen_slugs.insert(slug.clone());
        if slug_collision {
            warn!(%keyword, %slug, "slug collides with an earlier keyword; entries will shadow");
        }

        let mut error: Option<String> = None;
        let fragment = match synthesizer
            .synthesize(keyword, config.request.content_length, config.request.language)
            .await
        {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                warn!(%keyword, error = %e, "content synthesis failed, skipping HTML artifact");
                error = Some(e.to_string());
                None
            }
        };

        let mut html_written = false;
        if let Some(fragment) = &fragment {
            match renderer.render_article(fragment, &display_keyword) {
                Ok(html) => {
                    writer.add_entry(&format!("{slug}.html"), html.as_bytes())?;
                    html_written = true;
                }
                Err(e) => {
                    warn!(%keyword, error = %e, "article render failed, skipping HTML artifact");
                    error.get_or_insert(e.to_string());
                }
            }
        }

        let mut descriptor_written = false;
        if fragment.is_some() || config.descriptor_on_failure {
            match renderer.render_descriptor(&display_keyword, &slug) {
                Ok(json) => {
                    writer.add_entry(&format!("{slug}.html.json"), json.as_bytes())?;
                    descriptor_written = true;
                }
                Err(e) => {
                    warn!(%keyword, error = %e, "descriptor render failed");
                    error.get_or_insert(e.to_string());
                }
            }
        }

        let message = match &error {
            None => format!("{slug}.html and {slug}.html.json added"),
            Some(err) if descriptor_written => {
                format!("'{keyword}' failed ({err}); {slug}.html.json added")
            }
            Some(err) => format!("'{keyword}' failed ({err}); skipped"),
        };
        progress.keyword_processed(position, total, &message);

        outcomes.push(KeywordOutcome {
            keyword: keyword.clone(),
            slug,
            html_written,
            descriptor_written,
            slug_collision,
            error,
        });

        if config.rate_limit_ms > 0 && position < total {
            tokio::time::sleep(Duration::from_millis(config.rate_limit_ms)).await;
        }
    }

    let archive = writer.finish()?;
    Ok(BuildOutput { archive, outcomes })
}

// ---------------------------------------------------------------------------
// Run controller
// ---------------------------------------------------------------------------

/// Run the full generation sequence: load keywords, build the archive,
/// and hand back the finalized bytes.
///
/// Fails fast (before any archive writes) when the keyword payload is
/// malformed or empty. Per-keyword failures are collected in the result's
/// outcome log, never raised.
#[instrument(skip_all)]
pub async fn generate(
    raw_keywords: &[u8],
    config: &GenerateConfig,
    synthesizer: &dyn Synthesizer,
    renderer: &Renderer,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(
        %run_id,
        backend = synthesizer.name(),
        language = %config.request.language,
        content_length = config.request.content_length,
        "starting generation run"
    );

    progress.state(RunState::Loading);
    let keywords = match pageforge_keywords::load(raw_keywords) {
        Ok(keywords) => keywords,
        Err(e) => {
            progress.state(RunState::Failed);
            return Err(e);
        }
    };

    progress.state(RunState::Generating);
    let output = match build_archive(&keywords, config, synthesizer, renderer, progress).await {
        Ok(output) => output,
        Err(e) => {
            progress.state(RunState::Failed);
            return Err(e);
        }
    };

    let result = GenerateResult {
        run_id,
        keywords_total: keywords.len(),
        html_written: output.outcomes.iter().filter(|o| o.html_written).count(),
        descriptors_written: output
            .outcomes
            .iter()
            .filter(|o| o.descriptor_written)
            .count(),
        slug_collisions: output
            .outcomes
            .iter()
            .filter(|o| o.slug_collision)
            .count(),
        outcomes: output.outcomes,
        archive: output.archive,
        archive_name: config.archive_name.clone(),
        completed_at: Utc::now(),
        elapsed: start.elapsed(),
    };

    progress.state(RunState::Finalized);
    progress.done(&result);

    info!(
        run_id = %result.run_id,
        keywords = result.keywords_total,
        html = result.html_written,
        descriptors = result.descriptors_written,
        collisions = result.slug_collisions,
        elapsed_ms = result.elapsed.as_millis(),
        "generation run complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
