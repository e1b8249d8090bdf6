use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cyberchari::config::{DEFAULT_BRANCH, DEFAULT_GITHUB_API, DEFAULT_GITLAB_API};
use cyberchari::{
    ContractScanner, ContractStore, NewRepository, ParseResult, RepositoryProvider,
    RepositoryRecord, ScannerConfig, extract_contract_info,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cyberchari",
    version,
    about = "Find and fetch smart contracts in GitHub and GitLab repositories"
)]
struct Cli {
    /// GitHub REST API root
    #[arg(long, global = true, env = "CYBERCHARI_GITHUB_API", default_value = DEFAULT_GITHUB_API)]
    github_api: String,

    /// GitLab REST API root
    #[arg(long, global = true, env = "CYBERCHARI_GITLAB_API", default_value = DEFAULT_GITLAB_API)]
    gitlab_api: String,

    /// Per-request timeout in seconds (HTTP client default when unset)
    #[arg(long, global = true, env = "CYBERCHARI_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log output format (level is taken from RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plaintext)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Plaintext,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every .sol/.vy file of a repository branch
    Scan {
        url: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, env = "CYBERCHARI_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Record the scan in this database
        #[arg(long, env = "CYBERCHARI_DB")]
        db: Option<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that a repository exists and is readable
    Validate {
        url: String,
        #[arg(long, env = "CYBERCHARI_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Validate a repository and save it to the database
    Connect {
        url: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, env = "CYBERCHARI_TOKEN", hide_env_values = true)]
        token: Option<String>,
        #[arg(long, env = "CYBERCHARI_DB")]
        db: PathBuf,
    },
    /// List the stored contracts of a connected repository
    Contracts {
        url: String,
        #[arg(long, env = "CYBERCHARI_DB")]
        db: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List connected repositories
    Repos {
        #[arg(long, env = "CYBERCHARI_DB")]
        db: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show the recorded scans of a connected repository, newest first
    History {
        url: String,
        #[arg(long, env = "CYBERCHARI_DB")]
        db: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print pragma, contract name, imports and functions of a local file
    Inspect { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let mut config = ScannerConfig::new()
        .with_github_api(cli.github_api)
        .with_gitlab_api(cli.gitlab_api);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    match cli.command {
        Command::Scan {
            url,
            branch,
            token,
            db,
            json,
        } => {
            let mut store = db.as_ref().map(ContractStore::open).transpose()?;
            let connected = match &store {
                Some(store) => store.find_repository_by_url(&url)?,
                None => None,
            };
            let branch = scan_branch(branch, connected.as_ref())?;

            let scanner = ContractScanner::new(config)?;
            let result = scanner
                .parse_repository(&url, Some(branch.as_str()), token.as_deref())
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&url, &result);
            }

            if !result.is_ok() {
                return Ok(ExitCode::FAILURE);
            }

            if let (Some(store), Some(db)) = (store.as_mut(), db.as_ref()) {
                let repo = match connected {
                    Some(repo) => repo,
                    None => insert_repository(&scanner, store, &url, &branch, token.as_deref())?,
                };
                let scan = store.record_scan(repo.id, &branch, &result)?;
                eprintln!("✓ Recorded scan {} of {} in {}", scan.id, scan.branch, db.display());
            }

            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { url, token } => {
            let scanner = ContractScanner::new(config)?;
            if scanner.validate_repository(&url, token.as_deref()).await {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Connect {
            url,
            branch,
            token,
            db,
        } => {
            let scanner = ContractScanner::new(config)?;
            if !scanner.validate_repository(&url, token.as_deref()).await {
                eprintln!("Invalid repository URL or access denied");
                return Ok(ExitCode::FAILURE);
            }

            let store = ContractStore::open(&db)?;
            if let Some(existing) = store.find_repository_by_url(&url)? {
                println!("Already connected as #{}", existing.id);
                return Ok(ExitCode::SUCCESS);
            }

            let branch = branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string());
            let repo = insert_repository(&scanner, &store, &url, &branch, token.as_deref())?;
            println!("✓ Connected {} as #{}", repo.full_name, repo.id);
            Ok(ExitCode::SUCCESS)
        }
        Command::Contracts { url, db, json } => {
            let store = ContractStore::open(&db)?;
            let repo = store
                .find_repository_by_url(&url)?
                .with_context(|| format!("Repository not connected: {}", url))?;
            let contracts = store.contracts_for_repository(repo.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&contracts)?);
            } else {
                for contract in &contracts {
                    println!(
                        "  {:<9} {}  {}",
                        contract.kind,
                        contract.file_path,
                        short_hash(&contract.content_hash)
                    );
                }
                println!("{} contracts in {}", contracts.len(), repo.full_name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Repos { db, json } => {
            let store = ContractStore::open(&db)?;
            let repositories = store.list_repositories()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&repositories)?);
            } else {
                for repo in &repositories {
                    let last_scan = repo
                        .last_scan_at
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string());
                    println!(
                        "  #{:<4} {:<6} {} @ {}  {} contracts, last scan {}",
                        repo.id,
                        repo.provider.as_str(),
                        repo.full_name,
                        repo.branch,
                        repo.contracts_detected,
                        last_scan
                    );
                }
                println!("{} repositories connected", repositories.len());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::History { url, db, json } => {
            let store = ContractStore::open(&db)?;
            let repo = store
                .find_repository_by_url(&url)?
                .with_context(|| format!("Repository not connected: {}", url))?;
            let scans = store.scans_for_repository(repo.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&scans)?);
            } else {
                for scan in &scans {
                    println!(
                        "  {}  {}  {} contracts, {} skipped",
                        scan.scanned_at.to_rfc3339(),
                        scan.branch,
                        scan.contracts_found,
                        scan.files_skipped
                    );
                }
                println!("{} scans of {}", scans.len(), repo.full_name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let info = extract_contract_info(&content, &file_name(&file));
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Plaintext => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn insert_repository(
    scanner: &ContractScanner,
    store: &ContractStore,
    url: &str,
    branch: &str,
    token: Option<&str>,
) -> Result<RepositoryRecord> {
    let Some(provider) = scanner.registry().select(url) else {
        bail!("Unsupported repository provider: {}", url);
    };
    let reference = provider.locate(url, branch, token)?;
    store.insert_repository(&NewRepository::from_reference(url, &reference))
}

/// Branch to scan: `--branch`, else the connected branch, else the default.
/// A connected repository only accepts scans of its own branch.
fn scan_branch(requested: Option<String>, connected: Option<&RepositoryRecord>) -> Result<String> {
    let requested = requested.filter(|b| !b.trim().is_empty());

    match (requested, connected) {
        (Some(branch), Some(repo)) if branch != repo.branch => bail!(
            "{} is connected on branch '{}', not '{}'",
            repo.full_name,
            repo.branch,
            branch
        ),
        (Some(branch), _) => Ok(branch),
        (None, Some(repo)) => Ok(repo.branch.clone()),
        (None, None) => Ok(DEFAULT_BRANCH.to_string()),
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn print_result(url: &str, result: &ParseResult) {
    if let Some(error) = &result.error {
        eprintln!("✗ {}: {}", url, error);
        return;
    }

    for contract in &result.contracts {
        println!("  {:<9} {}", contract.kind, contract.file_path);
    }
    for skipped in &result.skipped {
        println!("  skipped   {} ({})", skipped.path, skipped.reason);
    }
    println!(
        "✓ {} contracts found, {} skipped",
        result.contracts.len(),
        result.skipped.len()
    );
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
