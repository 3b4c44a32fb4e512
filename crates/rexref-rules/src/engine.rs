//! Analysis engine
//!
//! Holds the immutable analysis setup (signatures, enabled checks, regex
//! parser) and runs it over files. Every file gets its own dispatcher and
//! regex cache, so files are analysed in parallel without shared state.

use crate::builtin::BuiltinChecks;
use crate::dispatch::{CheckDispatcher, EnabledCheck};
use crate::signatures::SignatureRegistry;
use rayon::prelude::*;
use rexref_core::syntax::parse_script;
use rexref_core::{
    CacheKeying, CacheStats, Diagnostic, RegexDialectParser, Result, ResultExt, RexrefConfig,
    RexrefError, SyntaxParser,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Diagnostics of one analysed file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub cache_stats: CacheStats,
}

pub struct RegexEngine {
    registry: SignatureRegistry,
    checks: Vec<EnabledCheck>,
    parser: Box<dyn RegexDialectParser>,
    keying: CacheKeying,
    threads: Option<usize>,
}

impl RegexEngine {
    /// Engine with the built-in checks and signatures adjusted by `config`
    pub fn new(config: &RexrefConfig) -> Result<Self> {
        if config.threads == Some(0) {
            return Err(RexrefError::config_error("threads must be at least 1"));
        }
        let engine = Self {
            registry: SignatureRegistry::from_config(config)?,
            checks: BuiltinChecks::enabled(config),
            parser: Box::new(SyntaxParser::new()),
            keying: config.cache_keying(),
            threads: config.threads,
        };
        debug!(
            "Regex engine ready: {} signatures, {} checks, {:?} cache keying",
            engine.registry.len(),
            engine.checks.len(),
            engine.keying
        );
        Ok(engine)
    }

    pub fn with_parser(mut self, parser: Box<dyn RegexDialectParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_checks(mut self, checks: Vec<EnabledCheck>) -> Self {
        self.checks = checks;
        self
    }

    pub fn checks(&self) -> &[EnabledCheck] {
        &self.checks
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    /// Analyse source text; `path` is only used in reported locations
    pub fn analyze_source(&self, path: &Path, source: &str) -> Result<FileReport> {
        let script = parse_script(source)?;
        let mut dispatcher = CheckDispatcher::new(
            path,
            source,
            &script,
            &self.registry,
            &self.checks,
            self.parser.as_ref(),
            self.keying,
        );

        let mut diagnostics = Vec::new();
        dispatcher.dispatch_all(&script, &mut diagnostics);
        let cache_stats = dispatcher.cache().stats();
        debug!(
            file = %path.display(),
            diagnostics = diagnostics.len(),
            cache_hits = cache_stats.hits,
            cache_misses = cache_stats.misses,
            "Analysed file"
        );

        Ok(FileReport {
            file: path.to_path_buf(),
            diagnostics,
            cache_stats,
        })
    }

    pub fn analyze_file(&self, path: &Path) -> Result<FileReport> {
        let source = fs::read_to_string(path).map_err(|e| RexrefError::io_error(path, e))?;
        self.analyze_source(path, &source)
    }

    /// Analyse files in parallel, in input order
    ///
    /// Files that cannot be read or parsed are logged and left out.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> Result<Vec<FileReport>> {
        let start_time = Instant::now();
        let run = || -> Vec<FileReport> {
            paths
                .par_iter()
                .filter_map(|path| self.analyze_file(path).log_and_continue())
                .collect()
        };

        let reports = match self.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|index| format!("rexref-worker-{index}"))
                .build()
                .map_err(|e| RexrefError::internal_error(format!("Thread pool: {e}")))?
                .install(run),
            None => run(),
        };

        info!(
            "Analysed {} of {} files in {:?}",
            reports.len(),
            paths.len(),
            start_time.elapsed()
        );
        Ok(reports)
    }
}
