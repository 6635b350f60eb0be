use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, error, info, warn};

use version_gate::action::outputs::workflow_command;
use version_gate::action::{ActionContext, ActionOutputs, Inputs, RunnerEnv};
use version_gate::hosting::GitHubClient;
use version_gate::logging::{LogFormat, init_tracing};
use version_gate::version::checker::run_check_until;

/// Exit code when the job is cancelled before the check finishes
const CANCELLED_EXIT_CODE: u8 = 130;

/// Exit code for configuration and I/O errors outside the check itself
const ERROR_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "version-gate")]
#[command(
    version,
    about = "Fail a pull request unless it bumps the semantic version in its version file"
)]
struct Cli {
    /// Repository-relative path of the JSON version file
    #[arg(long, env = "INPUT_VERSION-JSON-PATH")]
    version_json_path: Option<String>,

    /// Token for the hosting API (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Branch or ref the pull request targets (falls back to GITHUB_BASE_REF)
    #[arg(long, env = "INPUT_BRANCH_NAME")]
    branch_name: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Pull request number (read from the event payload when omitted)
    #[arg(long)]
    pull_request: Option<u64>,

    /// Hosting API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Timeout for each API request in milliseconds
    #[arg(long, env = "INPUT_TIMEOUT-MS")]
    timeout_ms: Option<u64>,

    #[arg(long, env = "VERSION_GATE_LOG_FORMAT", value_enum, default_value_t)]
    log_format: LogFormat,
}

impl Cli {
    fn inputs(&self) -> Inputs {
        Inputs {
            version_json_path: self.version_json_path.clone(),
            github_token: self.github_token.clone(),
            branch_name: self.branch_name.clone(),
            repository: self.repository.clone(),
            pull_request: self.pull_request,
            api_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format, Level::INFO);

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            println!("{}", workflow_command("error", &format!("{e:#}")));
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let context = ActionContext::resolve(cli.inputs(), RunnerEnv::from_env())
        .context("Invalid configuration")?;
    let client = GitHubClient::new(&context.client).context("Failed to create HTTP client")?;

    info!(
        "Checking {} in pull request #{} of {} against {}",
        context.check.version_path,
        context.check.pull_request,
        context.check.repo,
        context.check.base_ref
    );

    let shutdown = async {
        let signal = shutdown_signal().await;
        warn!("Received {}, abandoning version check", signal);
    };
    let Some(report) = run_check_until(&client, &context.check, shutdown).await else {
        return Ok(ExitCode::from(CANCELLED_EXIT_CODE));
    };

    ActionOutputs::from_env()
        .publish(&context.check, &report, &mut std::io::stdout().lock())
        .context("Failed to publish check result")?;

    Ok(if report.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolves with the name of the first termination signal received
async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!("Failed to listen for SIGINT: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}
