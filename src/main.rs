//! Resume ranker: rank resumes against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_ranker::config::Config;
use resume_ranker::error::{Result, ResumeRankerError};
use resume_ranker::input::{collect_candidates, InputManager};
use resume_ranker::models::ModelStore;
use resume_ranker::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_ranker::output::RankingReport;
use resume_ranker::processing::{
    CancellationFlag, EngineOptions, MatchEngine, MatchResult, Model2VecProvider, PassObserver,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Advances a progress bar as candidates finish
struct ProgressObserver {
    bar: ProgressBar,
}

impl PassObserver for ProgressObserver {
    fn on_candidate_finished(&self, _index: usize, result: &MatchResult) {
        self.bar.set_message(result.id().display_name().to_string());
        self.bar.inc(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            job_text,
            resumes,
            embedding,
            output,
            save,
            workers,
            timeout,
            detailed,
            no_color,
        } => {
            if let Some(embedding) = embedding {
                config.models.embedding_model = embedding;
            }
            if let Some(workers) = workers {
                config.processing.max_workers = workers;
            }
            if let Some(timeout) = timeout {
                config.processing.candidate_timeout_secs = timeout;
            }
            config.validate()?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeRankerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;
            let use_colors = config.output.color_output && !no_color && save.is_none();

            let reference_text = load_reference(job.as_deref(), job_text).await?;
            let candidates = collect_candidates(&resumes)?;
            if candidates.is_empty() {
                return Err(ResumeRankerError::InvalidInput(
                    "no resumes found in the given paths".to_string(),
                ));
            }

            // One model instance for the whole process
            let model = config.resolve_embedding_model();
            let provider = Arc::new(Model2VecProvider::load(&model)?);
            let engine = MatchEngine::new(provider, Arc::new(InputManager::new()), EngineOptions::from(&config));

            let bar = ProgressBar::new(candidates.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));

            let cancel = CancellationFlag::new();
            let ctrl_c_flag = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted: remaining resumes will be skipped");
                    ctrl_c_flag.cancel();
                }
            });

            info!("Ranking {} resumes", candidates.len());
            let start_time = Instant::now();
            let results = engine
                .analyze_with(
                    &reference_text,
                    &candidates,
                    Arc::new(ProgressObserver { bar: bar.clone() }),
                    &cancel,
                )
                .await;
            bar.finish_and_clear();
            let results = results?;

            let report = RankingReport::new(
                &results,
                &reference_text,
                engine.model_name(),
                start_time.elapsed().as_millis() as u64,
            );
            let rendered = ReportGenerator::with_options(use_colors, detailed).generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(&output_format, true))
                    } else {
                        path
                    };
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Models { action } => {
            let store = ModelStore::new(config.models.models_dir.clone(), config.models.available_models.clone());

            match action {
                ModelAction::List => {
                    println!("Embedding models ({}):\n", config.models.models_dir.display());
                    for model in store.available_models() {
                        let status = if store.is_downloaded(model) { "downloaded" } else { "available" };
                        let marker = if model.name == config.models.embedding_model { "*" } else { " " };
                        println!(
                            "{} {} ({}) - {} MB, {} dims [{}]",
                            marker, model.name, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                }

                ModelAction::Download { model, force } => {
                    let path = store.download(&model, force).await?;
                    println!("Model '{}' ready at {}", model, path.display());
                }

                ModelAction::Remove { model } => {
                    if store.remove(&model).await? {
                        println!("Model '{}' removed", model);
                    } else {
                        println!("Model '{}' is not downloaded", model);
                    }
                }

                ModelAction::Info { model } => {
                    let info = store
                        .get_model_info(&model)
                        .ok_or_else(|| ResumeRankerError::ModelNotFound(model.clone()))?;
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);
                    if store.is_downloaded(info) {
                        println!("Location: {}", store.model_dir(info).display());
                    } else {
                        println!("Status: not downloaded (resume-ranker models download {})", info.name);
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults at {}", config_path.display());
            }
        },
    }

    Ok(())
}

async fn load_reference(job: Option<&Path>, job_text: Option<String>) -> Result<String> {
    match (job, job_text) {
        (_, Some(text)) => Ok(text),
        (Some(path), None) => InputManager::new().extract_text(path).await,
        (None, None) => Err(ResumeRankerError::InvalidInput(
            "a job description is required (--job or --job-text)".to_string(),
        )),
    }
}
