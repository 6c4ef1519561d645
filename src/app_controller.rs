use anyhow::{Result, Context, anyhow};
use log::{error, warn, info};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::spreadsheet::write_workbook_file;
use crate::translation::TranslationService;

// @module: Application controller for spreadsheet processing

/// Name of the summary log written next to processed folders
pub const FOLDER_LOG_FILE: &str = "xlsx-translator.issues.log";

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Translated copy written to this path
    Translated(PathBuf),
    /// Output already existed and overwrite was not forced
    Skipped(PathBuf),
    /// Sheet contained nothing to translate; no file written
    NothingToTranslate,
}

/// Counts for a folder run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub errors: usize,
}

/// Main application controller for spreadsheet translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation service shared by every file of a run
    service: TranslationService,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let service = TranslationService::from_config(&config);
        Ok(Self::with_service(config, service))
    }

    // @method: Create a controller around an existing service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self { config, service }
    }

    /// Translation service used by this controller
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate one spreadsheet into `output_dir`
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, &output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_dir: &Path,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(output_dir)?;

        let output_path = FileManager::generate_output_path(input_file, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite): {}", output_path.display());
            return Ok(FileOutcome::Skipped(output_path));
        }

        let bytes = std::fs::read(input_file)
            .with_context(|| format!("Failed to read spreadsheet: {}", input_file.display()))?;

        info!("{}: {} via {}",
            input_file.file_name().map(|f| f.to_string_lossy().to_string()).unwrap_or_default(),
            self.config.translation.provider.display_name(),
            self.service.provider_name());

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        self.service.set_progress_listener(move |progress| {
            bar.set_length(progress.total as u64);
            bar.set_position(progress.current as u64);
            bar.set_message(progress.message.clone());
        });

        let api_key = self.config.translation.get_api_key();
        let result = self.service.translate_file(&bytes, &api_key).await;
        self.service.clear_progress_listener();
        progress_bar.finish_and_clear();

        let outcome = result.with_context(|| format!("Failed to translate {}", input_file.display()))?;

        match outcome.output {
            Some(output) => {
                write_workbook_file(&output, &output_path)
                    .with_context(|| format!("Failed to write {}", output_path.display()))?;
                info!("Success: {} ({})", output_path.display(), Self::format_duration(start_time.elapsed()));
                Ok(FileOutcome::Translated(output_path))
            }
            None => {
                info!("Nothing to translate in {}", input_file.display());
                Ok(FileOutcome::NothingToTranslate)
            }
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, translating every spreadsheet under a directory.
    /// Each translated copy is written next to its source.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_spreadsheets(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No spreadsheet files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for file in files.iter() {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_dir = file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone());

            match self.run_with_progress(file, &output_dir, &multi_progress, force_overwrite).await {
                Ok(FileOutcome::Translated(_)) => summary.translated += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(FileOutcome::NothingToTranslate) => summary.unchanged += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} translated, {} skipped, {} without text, {} errors",
            summary.translated, summary.skipped, summary.unchanged, summary.errors
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join(FOLDER_LOG_FILE);
        let entry = format!("{}: {} - Duration: {}",
            input_dir.display(), summary_message, Self::format_duration(start_time.elapsed()));
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &entry) {
            warn!("Failed to write folder logs to file: {}", e);
        }

        Ok(summary)
    }
}
