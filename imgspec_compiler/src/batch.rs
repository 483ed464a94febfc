//! Batch compilation of many image check clauses
//!
//! Clauses are compiled sequentially or across scoped worker threads. Either
//! way results come back in input order, each tagged with its clause label.

use crate::compiler::{compile_clause, CompileError};
use crate::config::compile_time::batch_processing::{MAX_CLAUSES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::CompilerDefaults;
use crate::logging::{self, codes};
use crate::spec::ImageCheckSpec;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    /// Stop after the first chunk that contains a failure
    pub fail_fast: bool,
    /// Directory relative `file` parameters are resolved against
    pub context_path: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            fail_fast: false,
            context_path: None,
        }
    }
}

/// One clause to compile, labelled with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseInput {
    pub label: String,
    pub text: String,
}

impl ClauseInput {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Outcome of compiling one clause
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseOutcome {
    pub label: String,
    pub result: Result<ImageCheckSpec, CompileError>,
}

/// Batch processing results, in input order
#[derive(Debug, Default)]
pub struct BatchResults {
    pub outcomes: Vec<ClauseOutcome>,
    /// Clauses never compiled because fail-fast stopped the batch
    pub skipped: usize,
    pub processing_duration: Duration,
}

impl BatchResults {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CompileError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.label.as_str(), e)))
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.outcomes.len() as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch compilation completed: {} clauses compiled, {} successful ({:.1}%), {} failed, {} skipped, {:.2}s total",
            self.outcomes.len(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.skipped,
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Failed to read clause file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Too many clauses in batch: {count} (max: {max})")]
    TooManyClauses { count: usize, max: usize },

    #[error("Worker thread panicked while compiling clauses")]
    WorkerPanicked,
}

impl BatchError {
    pub fn error_code(&self) -> logging::Code {
        match self {
            Self::Io { .. } => codes::batch::INPUT_READ_FAILURE,
            Self::TooManyClauses { .. } => codes::batch::BATCH_TOO_LARGE,
            Self::WorkerPanicked => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// Split text into clauses: one per line, blank lines and `#` comments skipped.
/// Labels are `<source>:<line>` with 1-based line numbers.
pub fn parse_clause_lines(source: &str, content: &str) -> Vec<ClauseInput> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(ClauseInput::new(format!("{}:{}", source, index + 1), trimmed))
            }
        })
        .collect()
}

/// Read a clause file
pub fn read_clause_file(path: &Path) -> Result<Vec<ClauseInput>, BatchError> {
    let content = fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_clause_lines(&path.display().to_string(), &content))
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Compile every clause, returning outcomes in input order
pub fn compile_batch(
    clauses: &[ClauseInput],
    defaults: &CompilerDefaults,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    // SECURITY: Bound batch size before spawning any work
    if clauses.len() > MAX_CLAUSES_PER_BATCH {
        return Err(BatchError::TooManyClauses {
            count: clauses.len(),
            max: MAX_CLAUSES_PER_BATCH,
        });
    }

    let start_time = Instant::now();
    let threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);
    let chunk_size = calculate_chunk_size(clauses.len(), threads);

    crate::log_info!("Starting batch compilation",
        "clauses" => clauses.len(),
        "threads" => threads,
        "chunk_size" => chunk_size
    );

    let mut results = BatchResults::default();

    for (chunk_index, chunk) in clauses.chunks(chunk_size).enumerate() {
        let first_id = chunk_index * chunk_size;
        let outcomes = if threads == 1 {
            compile_slice(chunk, first_id, defaults, config)
        } else {
            compile_chunk_parallel(chunk, first_id, threads, defaults, config)?
        };
        results.outcomes.extend(outcomes);

        if config.fail_fast && results.failure_count() > 0 {
            results.skipped = clauses.len() - results.outcomes.len();
            crate::log_warning!("Fail-fast mode enabled, stopping batch compilation",
                "skipped" => results.skipped
            );
            break;
        }
    }

    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch compilation completed",
        "compiled" => results.outcomes.len(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Compile a contiguous run of clauses on the current thread
fn compile_slice(
    clauses: &[ClauseInput],
    first_id: usize,
    defaults: &CompilerDefaults,
    config: &BatchConfig,
) -> Vec<ClauseOutcome> {
    let context_path = config.context_path.as_deref();

    let mut outcomes = Vec::with_capacity(clauses.len());
    for (offset, clause) in clauses.iter().enumerate() {
        let result = logging::with_clause_context(clause.label.as_str(), first_id + offset, || {
            compile_clause(&clause.text, context_path, defaults)
        });
        outcomes.push(ClauseOutcome {
            label: clause.label.clone(),
            result,
        });

        // Within a chunk only the sequential path can stop early
        if config.fail_fast && outcomes.last().is_some_and(|o| o.result.is_err()) {
            break;
        }
    }
    outcomes
}

/// Split a chunk across scoped worker threads and stitch results back in order
fn compile_chunk_parallel(
    chunk: &[ClauseInput],
    first_id: usize,
    threads: usize,
    defaults: &CompilerDefaults,
    config: &BatchConfig,
) -> Result<Vec<ClauseOutcome>, BatchError> {
    let per_thread = chunk.len().div_ceil(threads).max(1);
    let worker_config = BatchConfig {
        fail_fast: false,
        ..config.clone()
    };

    thread::scope(|scope| {
        let handles: Vec<_> = chunk
            .chunks(per_thread)
            .enumerate()
            .map(|(worker, slice)| {
                let worker_config = &worker_config;
                scope.spawn(move || {
                    compile_slice(slice, first_id + worker * per_thread, defaults, worker_config)
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(chunk.len());
        for handle in handles {
            let slice_outcomes = handle.join().map_err(|_| {
                crate::log_error!(
                    codes::batch::WORKER_FAILURE,
                    "Worker thread panicked during batch compilation"
                );
                BatchError::WorkerPanicked
            })?;
            outcomes.extend(slice_outcomes);
        }
        Ok(outcomes)
    })
}

/// Chunk size for parallel compilation; bounds how much work is discarded
/// when fail-fast stops the batch
fn calculate_chunk_size(clause_count: usize, max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 256;

    clause_count
        .div_ceil(max_threads.max(1))
        .saturating_mul(max_threads)
        .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}
