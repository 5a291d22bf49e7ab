//! resume-forge: resume generation and ranking tool

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_forge::cli::{self, Cli, Commands, ConfigAction, VersionAction};
use resume_forge::config::{Config, OutputFormat};
use resume_forge::error::{Result, ResumeForgeError};
use resume_forge::input::InputManager;
use resume_forge::llm::{HuggingFaceExpander, ResumeEnhancer};
use resume_forge::output::formatter::{resolve_report_path, save_report_to_file};
use resume_forge::output::{RankingReport, ReportFormatter, TemplateRenderer, VersionStore};
use resume_forge::output::report::ReportMetadata;
use resume_forge::processing::generator::{score_document, GenerateOptions, ResumeGenerator};
use resume_forge::processing::text_processor::truncate_text;
use resume_forge::processing::RankingService;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

const RESUME_EXTENSIONS: [&str; 5] = ["pdf", "txt", "md", "tex", "json"];
const JOB_EXTENSIONS: [&str; 4] = ["pdf", "txt", "md", "json"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
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

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn resolve_format(format: Option<String>, config: &Config) -> Result<OutputFormat> {
    match format {
        Some(format) => cli::parse_output_format(&format).map_err(ResumeForgeError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_job_description(input_manager: &mut InputManager, job: Option<&Path>) -> Result<Option<String>> {
    let Some(job) = job else {
        return Ok(None);
    };
    cli::validate_file_extension(job, &JOB_EXTENSIONS)
        .map_err(|e| ResumeForgeError::InvalidInput(format!("Job description file: {}", e)))?;

    let text = input_manager.extract_text(job).await?;
    info!("Job description: {} characters", text.len());
    Ok(Some(text))
}

fn build_enhancer(config: &Config, no_expand: bool) -> Result<Option<ResumeEnhancer<HuggingFaceExpander>>> {
    if no_expand || !config.expansion.enabled {
        return Ok(None);
    }

    match config.expansion_api_key() {
        Some(api_key) => {
            let expander = HuggingFaceExpander::new(&config.expansion, api_key)?;
            info!("Text expansion enabled with {}", expander.model_id());
            Ok(Some(ResumeEnhancer::new(expander)))
        }
        None => {
            warn!(
                "{} is not set, generating without text expansion",
                config.expansion.api_key_env
            );
            Ok(None)
        }
    }
}

fn emit(content: &str, destination: Option<&PathBuf>, format: OutputFormat, resume_name: &str) -> Result<()> {
    match destination {
        Some(destination) => {
            let path = resolve_report_path(destination, format, resume_name);
            save_report_to_file(content, &path)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    let formatter = ReportFormatter::with_options(config.output.color_output, config.output.detailed);

    match command {
        Commands::Generate {
            input,
            template,
            job,
            output,
            format,
            no_expand,
            save_version,
            report,
        } => {
            cli::validate_file_extension(&input, &["json"])
                .map_err(|e| ResumeForgeError::InvalidInput(format!("Resume input: {}", e)))?;
            let format = resolve_format(format, &config)?;

            let mut input_manager = InputManager::new();
            let job_description = read_job_description(&mut input_manager, job.as_deref()).await?;

            let options = GenerateOptions {
                template: template.unwrap_or_else(|| config.templates.default_template.clone()),
                job_description,
                output: output.clone(),
                expand: !no_expand,
            };

            let mut generator = ResumeGenerator::new(build_enhancer(&config, no_expand)?);
            let progress = generator
                .has_expander()
                .then(|| spinner("Expanding resume text..."));
            let result = generator.generate_from_path(&input, &options).await;
            if let Some(progress) = progress {
                progress.finish_and_clear();
            }
            let generated = result?;

            if output.is_none() && format == OutputFormat::Console {
                println!("{}", generated.document.content);
            }

            if let Some(name) = save_version {
                let store = VersionStore::new(config.versions_dir());
                let saved = store.save(
                    &name,
                    &generated.document,
                    Some(generated.report.heuristic.score),
                    generated.report.ranking.as_ref().map(|r| r.overall_score),
                )?;
                println!("Saved version '{}' in {}", saved.name, store.dir().display());
            }

            let content = formatter.format_report(&generated.report, format)?;
            let resume_name = input.display().to_string();
            emit(&content, report.as_ref(), format, &resume_name)?;
        }

        Commands::Rank { resume, job, format } => {
            let started = Instant::now();
            let format = resolve_format(format, &config)?;

            let mut input_manager = InputManager::new();
            let job_description = read_job_description(&mut input_manager, job.as_deref()).await?;

            let mut candidates = Vec::with_capacity(resume.len());
            for path in &resume {
                cli::validate_file_extension(path, &RESUME_EXTENSIONS)
                    .map_err(|e| ResumeForgeError::InvalidInput(format!("{}: {}", path.display(), e)))?;
                let text = input_manager.extract_text(path).await?;
                info!("{}: {}", path.display(), truncate_text(&text, 80));
                candidates.push((path.display().to_string(), text));
            }

            let service = RankingService::new(job_description);
            let provided = service.job_description().is_some();
            if !provided {
                warn!("No job description given; keyword relevance will be 0 for every resume");
            }
            let ranking = RankingReport {
                candidates: service.rank_many(candidates),
                metadata: ReportMetadata::new(started.elapsed().as_millis() as u64, provided),
            };

            println!("{}", formatter.format_ranking(&ranking, format)?);
        }

        Commands::Score { file, format } => {
            cli::validate_file_extension(&file, &RESUME_EXTENSIONS)
                .map_err(|e| ResumeForgeError::InvalidInput(format!("Resume file: {}", e)))?;
            let format = resolve_format(format, &config)?;

            let text = InputManager::new().extract_text(&file).await?;
            let report = score_document(&file.display().to_string(), &text, None);
            println!("{}", formatter.format_report(&report, format)?);
        }

        Commands::Templates => {
            println!("Available templates\n");
            for kind in TemplateRenderer::new().list_templates() {
                let marker = if kind.id() == config.templates.default_template {
                    " (default)"
                } else {
                    ""
                };
                println!("  {:<10} .{:<5} {}{}", kind.id(), kind.extension(), kind.description(), marker);
            }
        }

        Commands::Versions { action } => {
            let store = VersionStore::new(config.versions_dir());
            match action {
                VersionAction::List => {
                    let versions = store.list()?;
                    if versions.is_empty() {
                        println!("No saved versions in {}", store.dir().display());
                    }
                    for version in versions {
                        let score = version
                            .heuristic_score
                            .map(|s| format!("heuristic {}/100", s))
                            .unwrap_or_default();
                        println!(
                            "  {:<24} {:<9} {}  {}",
                            version.name,
                            version.template.id(),
                            version.saved_at.format("%Y-%m-%d %H:%M"),
                            score
                        );
                    }
                }
                VersionAction::Show { name } => {
                    let version = store.load(&name)?;
                    println!("{}", version.content);
                }
                VersionAction::Delete { name } => {
                    store.delete(&name)?;
                    println!("Deleted version '{}'", name);
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeForgeError::Configuration(e.to_string()))?;
                println!("# {}\n{}", config_path.display(), content);
                let key_state = if config.expansion_api_key().is_some() { "set" } else { "not set" };
                println!("# {} is {}", config.expansion.api_key_env, key_state);
            }
            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
