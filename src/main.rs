use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use page_translate::backend::ReportSink;
use page_translate::backend::fs::JsonReportSink;
use page_translate::config::job::JobFile;
use page_translate::config::merged::MergedConfig;
use page_translate::config;
use page_translate::pipeline::job_runner::JobConfig;
use page_translate::pipeline::orchestrator::run_all_jobs;
use page_translate::report::{FileReport, RunReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: page_translate <jobs.yaml>...");
        eprintln!("  Replace detected text on rasterized pages per job definitions.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("page_translate {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // Collect job configs and per-run report paths from all job files.
    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut report_path: Option<PathBuf> = None;
    let mut parallel_workers = 0;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if report_path.is_none() {
            let name = job_file
                .report
                .clone()
                .unwrap_or_else(|| settings.report_filename.clone());
            report_path = Some(resolve_path(&job_dir, &name));
        }
        parallel_workers = settings.parallel_workers;

        for job in &job_file.jobs {
            let merged = match MergedConfig::new(&settings, job) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("ERROR: Invalid configuration in {job_file_arg}: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let input_path = resolve_path(&job_dir, &job.input);
            let detections_path = resolve_path(&job_dir, &job.detections);
            let output_dir = resolve_path(&job_dir, &job.output);

            // Fail fast on unreadable inputs before any processing.
            if !input_path.is_dir() {
                eprintln!("ERROR: Input directory not found: {}", input_path.display());
                return ExitCode::FAILURE;
            }
            if !detections_path.is_file() {
                eprintln!(
                    "ERROR: Detections sidecar not found: {}",
                    detections_path.display()
                );
                return ExitCode::FAILURE;
            }

            job_configs.push(JobConfig {
                input_path,
                detections_path,
                output_dir,
                pages: job.pages.clone(),
                merged,
            });
        }
    }

    let start = Instant::now();
    let results = run_all_jobs(&job_configs, parallel_workers);
    let elapsed = start.elapsed().as_secs_f64();

    // Fold per-job results into the run report; a failed job becomes a
    // file entry with an error, not a dropped file.
    let mut has_error = false;
    let mut file_reports: Vec<FileReport> = Vec::with_capacity(results.len());
    for (config, result) in job_configs.iter().zip(results) {
        match result {
            Ok(report) => {
                eprintln!(
                    "OK: {} -> {} ({}/{} pages with text)",
                    config.input_path.display(),
                    config.output_dir.display(),
                    report.pages_with_text,
                    report.total_pages
                );
                file_reports.push(report);
            }
            Err(e) => {
                eprintln!("ERROR: {}: {e}", config.input_path.display());
                has_error = true;
                file_reports.push(FileReport {
                    file: config.input_path.display().to_string(),
                    total_pages: 0,
                    pages_with_text: 0,
                    pages: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let report = RunReport::assemble(file_reports, chrono::Utc::now().to_rfc3339(), elapsed);
    info!(
        files = report.metadata.total_files,
        pages = report.metadata.total_pages,
        replaced = report.metadata.total_replaced,
        failed = report.metadata.total_failed,
        "finished in {elapsed:.2}s"
    );

    if let Some(path) = report_path {
        let sink = JsonReportSink::new(&path);
        if let Err(e) = sink.write(&report) {
            eprintln!("ERROR: Failed to write report {}: {e}", path.display());
            has_error = true;
        } else {
            eprintln!("Report: {}", path.display());
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
