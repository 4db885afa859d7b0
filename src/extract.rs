//! # Parallel Batch Extraction
//!
//! Decrypt many independent byte ranges out of shared package files and
//! persist each one as its own artifact. Jobs come from an external index
//! (the asset database); this module only consumes them as values.
//!
//! Every job owns its [`Key`] and derives its own keystream state, so
//! workers share nothing mutable — only read-only container handles and
//! the classifier. A run always completes: per-job failures are captured
//! in the returned results, never raised.

use crate::consts::{FALLBACK_SUFFIX, PACKAGE_THIRD_KEY_WORD};
use crate::crypto::keystream::Key;
use crate::decrypt::DecryptingSource;
use crate::error::KlbdecError;
use crate::source::FileSource;

use log::debug;
#[cfg(feature = "batch-ops")]
use log::warn;
#[cfg(feature = "batch-ops")]
use rayon::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One decrypt-and-save unit of work, enumerated from the external asset
/// index. Immutable; owned by the extractor for the duration of a run and
/// handed back inside its [`JobResult`].
#[derive(Clone, Debug)]
pub struct ExtractionJob {
    /// Path of the package file holding the ciphertext.
    pub container: PathBuf,
    /// Byte offset of the asset inside the container.
    pub offset: u64,
    /// Exact ciphertext (== plaintext) length in bytes.
    pub length: u64,
    /// First derived key word from the index row.
    pub key1: u32,
    /// Second derived key word from the index row.
    pub key2: u32,
}

impl ExtractionJob {
    /// The working key for this job.
    ///
    /// The index stores two words per asset; the third is pinned to
    /// [`PACKAGE_THIRD_KEY_WORD`] by the format.
    pub fn key(&self) -> Key {
        Key::new(self.key1, self.key2, PACKAGE_THIRD_KEY_WORD)
    }

    /// Deterministic artifact name stem: container stem plus offset.
    ///
    /// Offsets are unique per container in the index, so re-running a
    /// batch overwrites its previous artifacts instead of colliding.
    fn artifact_stem(&self) -> String {
        let stem = self
            .container
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        format!("{stem}_{:08x}", self.offset)
    }
}

/// Outcome of one submitted job. Every job yields exactly one of these;
/// ordering follows submission order.
#[derive(Debug)]
pub struct JobResult {
    /// The job as submitted.
    pub job: ExtractionJob,
    /// Artifact path on success, the capturing error otherwise.
    pub outcome: Result<PathBuf, KlbdecError>,
}

/// Suffix-only payload classification.
///
/// Consulted once per successful decrypt to pick an output suffix. `None`
/// is not an error; the extractor falls back to [`FALLBACK_SUFFIX`].
pub trait PayloadClassifier: Sync {
    /// A file suffix (without the dot) for `payload`, if recognized.
    fn suffix(&self, payload: &[u8]) -> Option<&'static str>;
}

/// Magic-byte sniffer for the payload types the vendor's packages
/// actually contain.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicClassifier;

impl PayloadClassifier for MagicClassifier {
    fn suffix(&self, payload: &[u8]) -> Option<&'static str> {
        if payload.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some("png")
        } else if payload.starts_with(b"\xff\xd8\xff") {
            Some("jpg")
        } else if payload.starts_with(b"GIF87a") || payload.starts_with(b"GIF89a") {
            Some("gif")
        } else if payload.len() >= 12 && &payload[..4] == b"RIFF" && &payload[8..12] == b"WEBP" {
            Some("webp")
        } else if payload.starts_with(b"OggS") {
            Some("ogg")
        } else if payload.starts_with(b"UnityFS") {
            Some("unity3d")
        } else if payload.starts_with(b"SQLite format 3\0") {
            Some("db")
        } else {
            None
        }
    }
}

/// Cooperative stop signal for a batch run.
///
/// Firing it stops acceptance of not-yet-started jobs; in-flight jobs run
/// to completion (graceful drain). Cloneable and shareable across threads.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Request the drain.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the drain has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Worker-pool driver for [`ExtractionJob`]s.
pub struct BatchExtractor<C = MagicClassifier> {
    output_dir: PathBuf,
    concurrency: usize,
    classifier: C,
    cancel: CancelToken,
}

impl BatchExtractor<MagicClassifier> {
    /// Extractor writing artifacts under `output_dir`, classified by
    /// [`MagicClassifier`], with one worker per available core.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            concurrency: 0, // 0 = rayon's default (one per core)
            classifier: MagicClassifier,
            cancel: CancelToken::default(),
        }
    }
}

impl<C: PayloadClassifier> BatchExtractor<C> {
    /// Fix the worker-pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Swap in a different payload classifier.
    pub fn with_classifier<D: PayloadClassifier>(self, classifier: D) -> BatchExtractor<D> {
        BatchExtractor {
            output_dir: self.output_dir,
            concurrency: self.concurrency,
            classifier,
            cancel: self.cancel,
        }
    }

    /// Handle for requesting a graceful drain of a running batch.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every job to a [`JobResult`].
    ///
    /// Jobs are distributed across a fixed-size worker pool and are fully
    /// independent: no job's failure affects another, and every submitted
    /// job produces exactly one result.
    ///
    /// # Errors
    ///
    /// Only setup failures affecting the whole run are raised — creating
    /// the output directory or building the worker pool. Per-job errors
    /// are captured in the returned results.
    #[cfg(feature = "batch-ops")]
    pub fn run(&self, jobs: Vec<ExtractionJob>) -> Result<Vec<JobResult>, KlbdecError> {
        fs::create_dir_all(&self.output_dir)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()
            .map_err(|e| KlbdecError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        debug!(
            "extracting {} job(s) across {} worker(s)",
            jobs.len(),
            if self.concurrency == 0 {
                pool.current_num_threads()
            } else {
                self.concurrency
            }
        );

        let results = pool.install(|| {
            jobs.into_par_iter()
                .map(|job| {
                    let outcome = if self.cancel.is_cancelled() {
                        Err(KlbdecError::Cancelled)
                    } else {
                        self.run_job(&job)
                    };
                    if let Err(e) = &outcome {
                        warn!(
                            "job {}+{} of {} failed: {e}",
                            job.offset,
                            job.length,
                            job.container.display()
                        );
                    }
                    JobResult { job, outcome }
                })
                .collect()
        });

        Ok(results)
    }

    /// Sequential fallback when the `batch-ops` feature is disabled.
    #[cfg(not(feature = "batch-ops"))]
    pub fn run(&self, jobs: Vec<ExtractionJob>) -> Result<Vec<JobResult>, KlbdecError> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(jobs
            .into_iter()
            .map(|job| {
                let outcome = if self.cancel.is_cancelled() {
                    Err(KlbdecError::Cancelled)
                } else {
                    self.run_job(&job)
                };
                JobResult { job, outcome }
            })
            .collect())
    }

    /// One job: open, decrypt, classify, persist.
    fn run_job(&self, job: &ExtractionJob) -> Result<PathBuf, KlbdecError> {
        let container = FileSource::open(&job.container)?;
        let source = DecryptingSource::new(container, job.key());

        // On 32-bit targets a u64 length can exceed usize; an index row
        // that large is out of range for any real container.
        let length = usize::try_from(job.length).map_err(|_| KlbdecError::OutOfRange {
            offset: job.offset,
            length: job.length,
            size: source.size(),
        })?;
        let payload = source.read_at(job.offset, length)?;

        let suffix = self.classifier.suffix(&payload).unwrap_or_else(|| {
            debug!(
                "no classification for {}+{}, using .{FALLBACK_SUFFIX}",
                job.offset, job.length
            );
            FALLBACK_SUFFIX
        });

        let path = self
            .output_dir
            .join(format!("{}.{suffix}", job.artifact_stem()));
        fs::write(&path, &payload)?;
        debug!("wrote {} ({} bytes)", path.display(), payload.len());
        Ok(path)
    }
}
