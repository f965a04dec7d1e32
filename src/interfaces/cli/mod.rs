use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::{build_prompt, PartnerAnalysisUseCase};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{AppSettings, ConfigService};
use crate::infrastructure::llm_clients::{GeminiClient, LLMClient};

#[derive(Parser, Debug)]
#[command(name = "socioscan")]
#[command(about = "Find partners repeated across companies in a CNPJ partner extract and ask Gemini about them")]
#[command(version)]
pub struct Cli {
    /// Partner extract (semicolon-delimited, no header row)
    pub input: Option<PathBuf>,

    /// Settings file (default: socioscan.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of rows to read from the start of the file
    #[arg(long, short = 'n')]
    pub rows: Option<usize>,

    /// Number of distinct duplicate rows sent to the model
    #[arg(long)]
    pub sample: Option<usize>,

    /// Gemini model name
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Question appended after the table
    #[arg(long, short = 'q')]
    pub question: Option<String>,

    /// Environment variable holding the API key
    #[arg(long, value_name = "VAR")]
    pub api_key_env: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(input) = &self.input {
            settings.scan.input = input.clone();
        }
        if let Some(rows) = self.rows {
            settings.scan.max_rows = rows;
        }
        if let Some(sample) = self.sample {
            settings.scan.sample_size = sample;
        }
        if let Some(model) = &self.model {
            settings.llm.model = model.clone();
        }
        if let Some(question) = &self.question {
            settings.question = question.clone();
        }
        if let Some(var) = &self.api_key_env {
            settings.api_key_env = var.clone();
        }
    }

    fn config_service(&self) -> ConfigService {
        match &self.config {
            Some(path) => ConfigService::with_config_file(path),
            None => ConfigService::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Answered,
    NoDuplicates,
    ModelFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Answered | RunStatus::NoDuplicates => 0,
            RunStatus::ModelFailed => 5,
        }
    }
}

/// Run one analysis, writing the report to `out`.
///
/// The credential is checked before the input file is touched, and the model
/// is only called when the sample contains repeated partners.
pub async fn run<W: Write>(
    settings: &AppSettings,
    config_service: &ConfigService,
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    out: &mut W,
) -> Result<RunStatus> {
    let api_key = config_service.resolve_api_key(&settings.api_key_env)?;
    let llm_config = settings.llm_config().with_api_key(api_key);
    let scan_config = settings.scan_config()?;

    let use_case = PartnerAnalysisUseCase::new(llm_client);

    let report = match use_case.analyze(&scan_config)? {
        Some(report) => report,
        None => {
            writeln!(out, "\nNo duplicated partners found in the sample.")?;
            return Ok(RunStatus::NoDuplicates);
        }
    };

    writeln!(
        out,
        "\nFound {} partner rows repeated across companies.",
        report.duplicate_count()
    )?;
    writeln!(out, "\nSample of duplicated partners:")?;
    writeln!(out, "{}", report.table)?;

    let prompt = build_prompt(&report.table, &settings.question);

    writeln!(out, "\nSending the connection analysis request to the model...")?;
    out.flush()?;

    match use_case.ask(&llm_config, &prompt).await {
        Ok(answer) => {
            writeln!(out, "\n--- Model response ---")?;
            writeln!(out, "{}", answer)?;
            Ok(RunStatus::Answered)
        }
        Err(err) => {
            warn!(error = %err, "Model request failed");
            writeln!(out, "\nError generating the model response: {}", err)?;
            Ok(RunStatus::ModelFailed)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(err: AppError) -> ExitCode {
    error!(error = %err, "Run aborted");
    eprintln!("Error: {}", err);
    ExitCode::from(err.exit_code())
}

/// Binary entry point
pub async fn run_cli() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config_service = cli.config_service();

    let mut settings = match config_service.load() {
        Ok(settings) => settings,
        Err(err) => return fail(err),
    };
    cli.apply(&mut settings);

    info!(input = %settings.scan.input.display(), model = %settings.llm.model, "Starting partner scan");

    let client = Arc::new(GeminiClient::new(settings.llm.timeout_secs));
    let mut stdout = std::io::stdout();

    match run(&settings, &config_service, client, &mut stdout).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => fail(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMConfig;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
        reply: std::result::Result<String, String>,
    }

    impl CountingClient {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Ok(text.to_string()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Err(message.to_string()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LLMClient for CountingClient {
        async fn generate(&self, _config: &LLMConfig, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(AppError::LLMError)
        }
    }

    fn settings_for(input: &Path, key_var: &str) -> AppSettings {
        let mut settings = AppSettings::default();
        settings.scan.input = input.to_path_buf();
        settings.api_key_env = key_var.to_string();
        settings
    }

    /// Each test owns a distinct variable name, so parallel tests never share a key.
    fn with_key(var: &str) -> &str {
        std::env::set_var(var, "key");
        var
    }

    fn write_extract(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("socios.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_credential_reads_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = CountingClient::replying("unused");
        let settings = settings_for(
            &dir.path().join("does-not-exist.csv"),
            "SOCIOSCAN_TEST_CLI_NO_KEY",
        );
        let mut out = Vec::new();

        let err = run(&settings, &ConfigService::new(), client.clone(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingCredential(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_makes_no_api_call() {
        let dir = tempfile::tempdir().unwrap();
        let client = CountingClient::replying("unused");
        let settings = settings_for(
            &dir.path().join("absent.csv"),
            with_key("SOCIOSCAN_TEST_CLI_KEY_A"),
        );
        let mut out = Vec::new();

        let err = run(&settings, &ConfigService::new(), client.clone(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_duplicates_skips_model() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_extract(&dir, "1;2;ANA\n2;2;BIA\n");
        let client = CountingClient::replying("unused");
        let settings = settings_for(&input, with_key("SOCIOSCAN_TEST_CLI_KEY_B"));
        let mut out = Vec::new();

        let status = run(&settings, &ConfigService::new(), client.clone(), &mut out)
            .await
            .unwrap();

        assert_eq!(status, RunStatus::NoDuplicates);
        assert!(String::from_utf8(out).unwrap().contains("No duplicated partners"));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_run_prints_table_and_answer() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_extract(
            &dir,
            "11.111.111/0001-11;2;JOAO BARBOSA\n22.222.222/0001-22;2;ANA\n33.333.333/0001-33;2;JOAO BARBOSA\n",
        );
        let client = CountingClient::replying("Sim, JOAO BARBOSA aparece duas vezes.");
        let settings = settings_for(&input, with_key("SOCIOSCAN_TEST_CLI_KEY_C"));
        let mut out = Vec::new();

        let status = run(&settings, &ConfigService::new(), client.clone(), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(status, RunStatus::Answered);
        assert_eq!(client.calls(), 1);
        assert!(text.contains("Found 2 partner rows"));
        assert!(text.contains("11111111000111"));
        assert!(text.contains("--- Model response ---"));
        assert!(text.ends_with("Sim, JOAO BARBOSA aparece duas vezes.\n"));
    }

    #[tokio::test]
    async fn test_model_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_extract(&dir, "1;2;ANA\n2;2;ANA\n");
        let client = CountingClient::failing("quota exceeded");
        let settings = settings_for(&input, with_key("SOCIOSCAN_TEST_CLI_KEY_D"));
        let mut out = Vec::new();

        let status = run(&settings, &ConfigService::new(), client.clone(), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(status, RunStatus::ModelFailed);
        assert_eq!(status.exit_code(), 5);
        assert!(text.contains("Sample of duplicated partners"));
        assert!(text.contains("quota exceeded"));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::try_parse_from([
            "socioscan",
            "socios_2.csv",
            "--rows",
            "500",
            "--model",
            "gemini-1.5-pro",
            "-q",
            "Há algum sócio BARBOSA?",
        ])
        .unwrap();

        let mut settings = AppSettings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.scan.input, PathBuf::from("socios_2.csv"));
        assert_eq!(settings.scan.max_rows, 500);
        assert_eq!(settings.scan.sample_size, 10);
        assert_eq!(settings.llm.model, "gemini-1.5-pro");
        assert_eq!(settings.question, "Há algum sócio BARBOSA?");
    }
}
