//! git-timesheet - commit timesheets across local repositories
//!
//! # Usage
//! ```bash
//! git-timesheet ~/code                  # Start server for every repo under ~/code
//! git-timesheet ~/code --open           # Start and open browser
//! git-timesheet report ~/code --type fix --since 2024-01-01
//! git-timesheet status                  # Check if running
//! git-timesheet kill                    # Stop running instance
//! ```

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use clap::{Args, Parser, Subcommand};
use rust_embed::Embed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_timesheet::app::{self, AppState};
use git_timesheet::config::{DEFAULT_DAYS_BACK, TimesheetConfig};
use git_timesheet::error::AppError;
use git_timesheet::git::{CommitExtractor, GitCli};
use git_timesheet::session::{SelectionStore, Session, workspace_key};
use git_timesheet::view::{self, SortDirection, TypeFilter, ViewState};
use git_timesheet::{report, routes};

/// Embedded frontend static files
#[derive(Embed)]
#[folder = "assets"]
struct Assets;

/// git-timesheet - Recent commits from all your repositories, grouped by day
#[derive(Parser)]
#[command(name = "git-timesheet")]
#[command(about = "Commit timesheets across local git repositories", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    workspace: WorkspaceArgs,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "3002")]
    port: u16,
}

#[derive(Args, Clone)]
struct WorkspaceArgs {
    /// Workspace directories to search for repositories (default: current directory)
    #[arg(value_name = "ROOTS")]
    roots: Vec<PathBuf>,

    /// Lookback window in days
    #[arg(short, long, env = "GIT_TIMESHEET_DAYS_BACK", default_value_t = DEFAULT_DAYS_BACK)]
    days_back: u32,

    /// Author to report on (default: each repository's user.name)
    #[arg(short, long, env = "GIT_TIMESHEET_AUTHOR")]
    author: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the timesheet to stdout instead of serving it
    Report {
        #[command(flatten)]
        workspace: WorkspaceArgs,

        /// Case-insensitive search over subject, hash, and scope
        #[arg(short, long, default_value = "")]
        search: String,

        /// Commit type: feat, fix, refactor, build, merge, other, or all
        #[arg(short = 't', long = "type", default_value = "all")]
        type_filter: TypeFilter,

        /// Only include days on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "desc")]
        sort: SortDirection,
    },
    /// Check if git-timesheet is currently running
    Status,
    /// Stop the running git-timesheet instance
    Kill,
}

/// PID file info stored as JSON
#[derive(serde::Serialize, serde::Deserialize)]
struct PidInfo {
    pid: u32,
    roots: Vec<String>,
    port: u16,
}

fn get_pid_file_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("git-timesheet.pid");
    path
}

fn read_pid_info() -> Option<PidInfo> {
    let path = get_pid_file_path();
    let mut file = fs::File::open(&path).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_pid_info(info: &PidInfo) -> anyhow::Result<()> {
    let path = get_pid_file_path();
    let mut file = fs::File::create(&path)?;
    file.write_all(serde_json::to_string(info)?.as_bytes())?;
    Ok(())
}

fn remove_pid_file() {
    let _ = fs::remove_file(get_pid_file_path());
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // On Unix, sending signal 0 checks if process exists
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use std::process::Command;
    Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(unix)]
fn kill_process(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, libc::SIGTERM) == 0 }
}

#[cfg(windows)]
fn kill_process(pid: u32) -> bool {
    use std::process::Command;
    Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn print_roots(roots: &[String]) {
    for root in roots {
        println!("  Root: {}", root);
    }
}

fn handle_status() {
    match read_pid_info() {
        Some(info) => {
            if is_process_running(info.pid) {
                println!("✓ git-timesheet is running");
                println!("  PID:  {}", info.pid);
                print_roots(&info.roots);
                println!("  URL:  http://127.0.0.1:{}", info.port);
            } else {
                println!("✗ git-timesheet is not running (stale PID file)");
                remove_pid_file();
            }
        }
        None => {
            println!("✗ git-timesheet is not running");
        }
    }
}

fn handle_kill() {
    match read_pid_info() {
        Some(info) => {
            if is_process_running(info.pid) {
                if kill_process(info.pid) {
                    println!("✓ Stopped git-timesheet (PID {})", info.pid);
                    remove_pid_file();
                } else {
                    println!("✗ Failed to stop git-timesheet (PID {})", info.pid);
                }
            } else {
                println!("✗ git-timesheet is not running (stale PID file)");
                remove_pid_file();
            }
        }
        None => {
            println!("✗ git-timesheet is not running");
        }
    }
}

/// Serve embedded static files
async fn serve_static(req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    // Default to index.html for root or non-file paths (SPA routing)
    let path = if path.is_empty() || !path.contains('.') {
        "index.html"
    } else {
        path
    };

    let (path, content) = match Assets::get(path) {
        Some(content) => (path, content),
        None => match Assets::get("index.html") {
            Some(content) => ("index.html", content),
            None => return (StatusCode::NOT_FOUND, "Not Found").into_response(),
        },
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        content.data.into_owned(),
    )
        .into_response()
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve roots (default: current directory) or exit with a message.
async fn open_workspace_or_exit(roots: &[PathBuf]) -> Vec<PathBuf> {
    let roots = if roots.is_empty() {
        std::env::current_dir().map(|cwd| vec![cwd]).unwrap_or_default()
    } else {
        roots.to_vec()
    };

    match app::open_workspace(&roots).await {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("✗ {}", e);
            for root in &roots {
                eprintln!("  Path: {}", root.display());
            }
            std::process::exit(1);
        }
    }
}

fn exit_no_repositories(e: AppError, roots: &[PathBuf]) -> ! {
    eprintln!("✗ {}", e);
    for root in roots {
        eprintln!("  Searched: {}", root.display());
    }
    std::process::exit(1);
}

async fn run_report(workspace: WorkspaceArgs, view_state: ViewState) -> anyhow::Result<()> {
    let roots = open_workspace_or_exit(&workspace.roots).await;
    let config = TimesheetConfig::new(workspace.days_back, workspace.author);

    let repositories = match app::discover(&roots).await {
        Ok(repos) => repos,
        Err(e) => exit_no_repositories(e, &roots),
    };

    let store = SelectionStore::default_location();
    let mut session = Session::new(roots.clone(), store.load(&workspace_key(&roots)));
    session.set_repositories(repositories);

    let extractor = CommitExtractor::new(Arc::new(GitCli::default()));
    let commits = extractor.extract(&session.active_repositories(), &config).await;
    session.replace_commits(commits, config.days_back);

    let view = view::build(session.commits(), &view_state);
    print!("{}", report::render(&view, config.days_back));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Status) => {
            handle_status();
            return Ok(());
        }
        Some(Commands::Kill) => {
            handle_kill();
            return Ok(());
        }
        Some(Commands::Report {
            workspace,
            search,
            type_filter,
            since,
            sort,
        }) => {
            init_tracing();
            let view_state = ViewState {
                search,
                type_filter,
                since,
                sort,
                ..Default::default()
            };
            return run_report(workspace, view_state).await;
        }
        None => {}
    }

    // Check if already running
    if let Some(info) = read_pid_info() {
        if is_process_running(info.pid) {
            eprintln!("✗ git-timesheet is already running (PID {})", info.pid);
            eprintln!("  URL:  http://127.0.0.1:{}", info.port);
            eprintln!();
            eprintln!("Run 'git-timesheet kill' to stop it first.");
            std::process::exit(1);
        } else {
            remove_pid_file();
        }
    }

    // Initialize tracing (quieter for production)
    init_tracing();

    let roots = open_workspace_or_exit(&cli.workspace.roots).await;
    let config = TimesheetConfig::new(cli.workspace.days_back, cli.workspace.author.clone());

    let state = Arc::new(AppState::new(
        roots.clone(),
        Arc::new(GitCli::default()),
        config.clone(),
        SelectionStore::default_location(),
    ));

    // Nothing to operate on: report it before starting the server
    let listing = match state.rescan().await {
        Ok(listing) => listing,
        Err(e) => exit_no_repositories(e, &roots),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router with API routes and static file serving
    let app = Router::new()
        .merge(routes::create_router(state))
        .fallback(get(serve_static))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind to the port
    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", cli.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    // Write PID file
    let root_strings: Vec<String> = roots.iter().map(|r| r.to_string_lossy().to_string()).collect();
    let pid_info = PidInfo {
        pid: std::process::id(),
        roots: root_strings.clone(),
        port: cli.port,
    };
    write_pid_info(&pid_info)?;

    // Print startup message
    let url = format!("http://127.0.0.1:{}", cli.port);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                git-timesheet                │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    print_roots(&root_strings);
    println!("  Repositories: {}", listing.repositories.len());
    println!("  Window:       last {} days", config.days_back);
    if let Some(author) = &config.author {
        println!("  Author:       {}", author);
    }
    println!("  Server:       {}", url);
    println!();
    println!("  Commands:");
    println!("    git-timesheet status  - Check if running");
    println!("    git-timesheet kill    - Stop the server");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    // Open browser if requested
    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
        remove_pid_file();
    };

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
