//! @ai:module:intent CLI for the prompt evaluation and benchmarking engine
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prompt_bench::{
    config::{EngineConfig, TestFilter},
    metrics::{BenchmarkResult, SuiteResult},
    provider::{build_registry, RunContext},
    report::{JsonReporter, ReportGenerator},
    runner::{
        BenchOptions, BenchmarkRunner, EchoExecutor, OutputExecutor, ProviderExecutor,
        TestRunOptions, TestRunner,
    },
    store::{DirectoryStore, FileSnapshotStore},
    suite::{SuiteFile, SuiteLoader, SuiteLoaderTrait, TestSuite},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "prompt-bench")]
#[command(about = "Test and benchmark versioned prompts against language models")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to prompt-bench.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a test suite file or every suite in a directory
    Test {
        /// Suite file or directory of suite files
        path: PathBuf,

        /// Call a real model instead of echoing the rendered prompt
        #[arg(long)]
        live: bool,

        /// Model used for live execution
        #[arg(short, long)]
        model: Option<String>,

        /// Overwrite snapshot baselines with the current output
        #[arg(long)]
        update_snapshots: bool,

        /// Only run tests carrying one of these tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,

        /// Only run tests with these names (comma-separated)
        #[arg(long)]
        names: Option<String>,

        /// Print results as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Also write JSON and Markdown suite reports into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Benchmark a prompt across the models listed in a suite
    Bench {
        /// Benchmark suite file
        suite: PathBuf,

        /// Iterations per model, overriding the suite
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        runs: Option<u32>,

        /// Output directory for results (a timestamped run directory is created inside)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate suite files without running them
    Validate {
        /// Suite file or directory of suite files
        path: PathBuf,
    },

    /// Generate reports from an existing results file
    Report {
        /// Path to results JSON file
        #[arg(short, long)]
        results: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "prompt-bench.toml")]
        output: PathBuf,

        /// Also write an example prompt and suites
        #[arg(long)]
        with_examples: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prompt_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Test {
            path,
            live,
            model,
            update_snapshots,
            tags,
            names,
            json,
            output,
        } => {
            run_tests(
                config,
                TestArgs {
                    path,
                    live,
                    model,
                    update_snapshots,
                    tags,
                    names,
                    json,
                    output,
                },
            )
            .await
        }
        Commands::Bench { suite, runs, output } => run_benchmark(config, suite, runs, output).await,
        Commands::Validate { path } => validate(&path),
        Commands::Report { results, output } => generate_reports(&results, &output),
        Commands::Init {
            output,
            with_examples,
        } => init(&output, with_examples),
    }
}

struct TestArgs {
    path: PathBuf,
    live: bool,
    model: Option<String>,
    update_snapshots: bool,
    tags: Option<String>,
    names: Option<String>,
    json: bool,
    output: Option<PathBuf>,
}

/// @ai:intent Context whose token is cancelled on Ctrl-C
/// @ai:effects state:write
fn interruptible_context(config: &EngineConfig) -> RunContext {
    let token = CancellationToken::new();
    let on_signal = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding requests");
            on_signal.cancel();
        }
    });

    RunContext::new()
        .with_cancellation(token)
        .with_timeout(Duration::from_secs(config.api.timeout_secs))
}

/// @ai:intent Load one suite file, or every valid suite in a directory
/// @ai:effects fs:read
fn load_test_suites(path: &Path) -> Result<Vec<TestSuite>> {
    let loader = SuiteLoader::new();

    if path.is_dir() {
        Ok(loader.load_test_suites(path)?)
    } else {
        let suite = loader
            .load_test_suite(path)
            .with_context(|| format!("Failed to load suite {}", path.display()))?;
        Ok(vec![suite])
    }
}

/// Results of a multi-suite run; `aborted` counts suites that could not start
struct SuiteBatch {
    results: Vec<SuiteResult>,
    aborted: usize,
}

/// @ai:intent Run suites in order, skipping any whose prompt cannot be resolved
/// @ai:post one suite failing to start never stops the rest
/// @ai:effects network, fs:read, fs:write
async fn run_suites(runner: &TestRunner, ctx: &RunContext, suites: &[TestSuite]) -> SuiteBatch {
    let total = suites.len();
    let mut batch = SuiteBatch {
        results: Vec::with_capacity(total),
        aborted: 0,
    };

    for (i, suite) in suites.iter().enumerate() {
        tracing::info!("[{}/{}] Running {}", i + 1, total, suite.name);
        match runner.run(ctx, suite).await {
            Ok(result) => batch.results.push(result),
            Err(e) => {
                tracing::warn!("Suite {} could not run: {}", suite.name, e);
                batch.aborted += 1;
            }
        }
    }

    batch
}

/// @ai:intent Run test suites and report pass/fail
/// @ai:post exit code 1 when any selected test failed or any suite could not run
/// @ai:effects network, fs:read, fs:write
async fn run_tests(config: EngineConfig, args: TestArgs) -> Result<ExitCode> {
    let suites = load_test_suites(&args.path)?;
    if suites.is_empty() {
        tracing::warn!("No test suites found in {}", args.path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let live = args.live || config.run.live;
    let executor: Arc<dyn OutputExecutor> = if live {
        let model = args.model.unwrap_or_else(|| config.run.model.clone());
        tracing::info!("Running live against {}", model);
        let registry = Arc::new(build_registry(&config)?);
        Arc::new(ProviderExecutor::new(
            registry,
            model,
            config.run.max_tokens,
            config.run.temperature,
        ))
    } else {
        Arc::new(EchoExecutor::new())
    };

    let filter = if args.tags.is_some() || args.names.is_some() {
        TestFilter::from_lists(args.tags.as_deref(), args.names.as_deref())
    } else {
        config.run.filter.clone()
    };

    let runner = TestRunner::new(
        Arc::new(DirectoryStore::new(&config.paths.prompts_dir)),
        executor,
        Arc::new(FileSnapshotStore::new(&config.paths.snapshots_dir)),
    )
    .with_options(TestRunOptions {
        update_snapshots: args.update_snapshots || config.run.update_snapshots,
        filter,
    });

    let ctx = interruptible_context(&config);
    let batch = run_suites(&runner, &ctx, &suites).await;

    if let Some(dir) = &args.output {
        let reporter = ReportGenerator::new();
        for result in &batch.results {
            reporter.generate_suite(result, dir)?;
        }
    }

    let results = batch.results;
    let aborted = batch.aborted;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_test_summary(&results);
        if aborted > 0 {
            println!("{} suite(s) could not run", aborted);
        }
    }

    if aborted == 0 && results.iter().all(SuiteResult::is_success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// @ai:intent Run a benchmark suite and write its reports
/// @ai:effects network, fs:read, fs:write
async fn run_benchmark(
    config: EngineConfig,
    suite_path: PathBuf,
    runs: Option<u32>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let suite = SuiteLoader::new()
        .load_benchmark_suite(&suite_path)
        .with_context(|| format!("Failed to load benchmark {}", suite_path.display()))?;

    let runs = runs.or(suite.runs_per_model).unwrap_or(config.run.runs_per_model);
    let registry = Arc::new(build_registry(&config)?);
    tracing::info!(
        "Benchmarking {} across {} models ({} runs each), providers: {}",
        suite.name,
        suite.models.len(),
        runs,
        registry.names().join(", ")
    );

    let runner = BenchmarkRunner::new(
        Arc::new(DirectoryStore::new(&config.paths.prompts_dir)),
        registry,
    )
    .with_options(BenchOptions {
        max_tokens: config.run.max_tokens,
        temperature: config.run.temperature,
        runs: Some(runs),
    });

    let ctx = interruptible_context(&config);
    let result = runner.run(&ctx, &suite).await?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = output
        .unwrap_or_else(|| config.paths.results_dir.clone())
        .join(timestamp.to_string());
    ReportGenerator::new().generate_benchmark(&result, &output_dir)?;

    print_benchmark_summary(&result);
    println!("Reports written to {}", output_dir.display());
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Validate one suite file or every TOML file in a directory
/// @ai:post exit code 1 when any file is invalid
/// @ai:effects fs:read
fn validate(path: &Path) -> Result<ExitCode> {
    let files = if path.is_dir() {
        SuiteLoader::find_suite_files(path)
    } else {
        vec![path.to_path_buf()]
    };

    let loader = SuiteLoader::new();
    let mut invalid = 0;

    for file in &files {
        match loader.load_any(file) {
            Ok(SuiteFile::Test(suite)) => {
                println!("  ok    {} (test suite '{}', {} tests)", file.display(), suite.name, suite.tests.len());
            }
            Ok(SuiteFile::Benchmark(suite)) => {
                println!(
                    "  ok    {} (benchmark '{}', {} models)",
                    file.display(),
                    suite.name,
                    suite.models.len()
                );
            }
            Err(e) => {
                invalid += 1;
                println!("  error {}: {}", file.display(), e);
            }
        }
    }

    println!();
    println!("{} files checked, {} invalid", files.len(), invalid);

    if invalid == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// @ai:intent Generate reports from an existing results file
/// @ai:effects fs:read, fs:write
fn generate_reports(results_path: &Path, output_dir: &Path) -> Result<ExitCode> {
    let result = JsonReporter::new().load_benchmark(results_path)?;
    ReportGenerator::new().generate_benchmark(&result, output_dir)?;

    println!("Reports generated in {}", output_dir.display());
    Ok(ExitCode::SUCCESS)
}

const EXAMPLE_PROMPT: &str = "Summarize the following topic in one sentence: {{topic}}\n";

const EXAMPLE_TEST_SUITE: &str = r#"name = "summarize-basics"
prompt = "summarize"

[[tests]]
name = "mentions topic"
tags = ["smoke"]

[tests.inputs]
topic = "rust ownership"

[[tests.assertions]]
type = "contains"
value = "rust ownership"

[[tests.assertions]]
type = "max_length"
value = 500
"#;

const EXAMPLE_BENCH_SUITE: &str = r#"name = "summarize-models"
prompt = "summarize"
models = ["mock", "claude-3-5-haiku-20241022", "gpt-4o-mini"]
runs_per_model = 3

[variables]
topic = "rust ownership"
"#;

/// @ai:intent Write a default configuration file and optional example content
/// @ai:effects fs:write
fn init(output: &Path, with_examples: bool) -> Result<ExitCode> {
    let config = EngineConfig::default();
    config.save(output)?;
    println!("Configuration saved to {}", output.display());

    if with_examples {
        let examples = [
            (config.paths.prompts_dir.join("summarize.md"), EXAMPLE_PROMPT),
            (config.paths.suites_dir.join("summarize.toml"), EXAMPLE_TEST_SUITE),
            (config.paths.suites_dir.join("summarize.bench.toml"), EXAMPLE_BENCH_SUITE),
        ];

        for (path, content) in examples {
            if path.exists() {
                println!("Skipping existing {}", path.display());
                continue;
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_test_summary(results: &[SuiteResult]) {
    println!();
    println!("Test Results");
    println!("============");
    println!();
    println!(
        "{:<30} {:>8} {:>8} {:>8} {:>8}",
        "Suite", "Passed", "Failed", "Skipped", "Total"
    );
    println!("{}", "-".repeat(66));

    for result in results {
        println!(
            "{:<30} {:>8} {:>8} {:>8} {:>8}",
            result.suite, result.passed, result.failed, result.skipped, result.total
        );
    }
    println!();

    for result in results {
        for test in result.failures() {
            println!("FAIL {} :: {}", result.suite, test.name);
            if let Some(error) = &test.error {
                println!("  {}", error);
            }
            for failure in &test.failures {
                println!("  [{}] {}", failure.kind, failure.message);
            }
        }
    }
}

fn print_benchmark_summary(result: &BenchmarkResult) {
    println!();
    println!("Benchmark Results: {} ({} {})", result.suite, result.prompt, result.version);
    println!("=======================");
    println!();
    println!(
        "{:<32} {:>8} {:>8} {:>10} {:>12} {:>8}",
        "Model", "p50", "p99", "Tokens", "Cost/Req", "Errors"
    );
    println!("{}", "-".repeat(84));

    for model in &result.models {
        println!(
            "{:<32} {:>8} {:>8} {:>10} {:>12} {:>7.1}%",
            model.model,
            model
                .p50_latency_ms
                .map(|v| format!("{}ms", v))
                .unwrap_or_else(|| "-".to_string()),
            model
                .p99_latency_ms
                .map(|v| format!("{}ms", v))
                .unwrap_or_else(|| "-".to_string()),
            model
                .avg_total_tokens
                .map(|v| format!("{:.0}", v))
                .unwrap_or_else(|| "-".to_string()),
            model
                .cost_per_request
                .map(|v| format!("${:.6}", v))
                .unwrap_or_else(|| "-".to_string()),
            model.error_rate * 100.0
        );
    }
    println!();
}
