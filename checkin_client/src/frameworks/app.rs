// Framework bootstrap for the terminal check-in client.

use crate::domain::SessionStore;
use crate::frameworks::config;
use crate::interface_adapters::clients::TicketsClient;
use crate::interface_adapters::console::{self, AttendanceCommand, MainCommand};
use crate::interface_adapters::scanner::{LineScanner, SharedLines};
use crate::interface_adapters::session_file::FileSessionStore;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{LogoutOutcome, ScanOutcome, Shell};

use std::io::{BufRead, Result};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, mpsc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr; stdout belongs to the screens.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Drives the shell from input lines until the user quits or input ends.
pub async fn run<W>(state: AppState, lines: SharedLines, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut shell = Shell::new(state);
    write(out, &console::render(shell.screen())).await?;
    if let Err(err) = shell.start().await {
        tracing::error!(error = %err, "failed to leave splash screen.");
        return Ok(());
    }

    loop {
        write(out, &console::render(shell.screen())).await?;

        let keep_going = match shell.screen().name() {
            "login" => login_step(&mut shell, &lines, out).await?,
            "main" => main_step(&mut shell, &lines, out).await?,
            "attendance" => attendance_step(&mut shell, &lines, out).await?,
            other => {
                tracing::error!(screen = other, "no input handler for screen.");
                false
            }
        };
        if !keep_going {
            break;
        }
    }

    write(out, "Bye\n").await
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(
        config::session_dir(),
        config::SESSION_STORE_NAME,
    ));

    let api_base_url = config::api_base_url();
    let http_timeout = config::http_timeout();
    let api = TicketsClient::new(&api_base_url, http_timeout, Arc::clone(&sessions))
        .map_err(|e| std::io::Error::other(format!("failed to initialize tickets client: {e}")))?;
    tracing::debug!(
        api_base_url = %api_base_url,
        http_timeout_ms = http_timeout.as_millis(),
        "tickets client configured"
    );

    let lines = spawn_stdin_reader();
    let scanner = LineScanner::new(Arc::clone(&lines), config::scanner_enabled());

    let state = AppState {
        api: Arc::new(api),
        sessions,
        scanner: Arc::new(scanner),
        db_name: config::db_name(),
    };

    let mut stdout = tokio::io::stdout();
    run(state, lines, &mut stdout).await
}

// Stdin is read on a plain thread; a blocking read inside the runtime would stall shutdown.
fn spawn_stdin_reader() -> SharedLines {
    let (tx, rx) = mpsc::channel::<String>(config::INPUT_CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to read stdin.");
                    break;
                }
            }
        }
    });
    Arc::new(Mutex::new(rx))
}

async fn write<W>(out: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

async fn notice<W>(out: &mut W, message: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    write(out, &format!("{message}\n")).await
}

// Prints a prompt and waits for the next line; `None` once input is closed.
async fn prompt<W>(out: &mut W, lines: &SharedLines, label: &str) -> Result<Option<String>>
where
    W: AsyncWrite + Unpin,
{
    write(out, label).await?;
    Ok(lines.lock().await.recv().await)
}

async fn login_step<W>(shell: &mut Shell, lines: &SharedLines, out: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let Some(username) = prompt(out, lines, "Username: ").await? else {
        return Ok(false);
    };
    let Some(password) = prompt(out, lines, "Password: ").await? else {
        return Ok(false);
    };

    write(out, "Logging in...\n").await?;
    match shell.login(&username, &password).await {
        Ok(()) => notice(out, &format!("Logged in as {}", username.trim())).await?,
        Err(err) => notice(out, &err.to_string()).await?,
    }
    Ok(true)
}

async fn main_step<W>(shell: &mut Shell, lines: &SharedLines, out: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let Some(line) = prompt(out, lines, "> ").await? else {
        return Ok(false);
    };

    match console::parse_main_command(&line) {
        Some(MainCommand::Scan) => {
            write(out, &console::scan_prompt()).await?;
            match shell.scan().await {
                Ok(ScanOutcome::Opened { .. }) => {}
                Ok(ScanOutcome::PermissionDenied) => {
                    notice(out, "Scanner access is required to scan QR codes").await?
                }
                Ok(ScanOutcome::Cancelled) => notice(out, "Scan cancelled").await?,
                Err(err) => notice(out, &format!("Error: {err}")).await?,
            }
        }
        Some(MainCommand::Logout) => match shell.logout().await {
            Ok(LogoutOutcome::Offline) => notice(out, "Logged out (offline)").await?,
            Ok(LogoutOutcome::Remote | LogoutOutcome::NoSession) => {
                notice(out, "Logged out successfully").await?
            }
            Err(err) => notice(out, &format!("Error: {err}")).await?,
        },
        Some(MainCommand::Quit) => return Ok(false),
        None => notice(out, "Unknown command").await?,
    }
    Ok(true)
}

async fn attendance_step<W>(shell: &mut Shell, lines: &SharedLines, out: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let Some(line) = prompt(out, lines, "> ").await? else {
        return Ok(false);
    };

    match console::parse_attendance_command(&line) {
        Some(AttendanceCommand::Toggle(index)) => {
            let rejected = shell
                .attendance_mut()
                .and_then(|screen| screen.toggle(index).err());
            if let Some(rejected) = rejected {
                notice(out, console::describe_rejection(rejected)).await?;
            }
        }
        Some(AttendanceCommand::Submit) => {
            write(out, "Submitting...\n").await?;
            match shell.submit().await {
                Ok(_) => notice(out, "Attendance updated successfully!").await?,
                Err(err) => notice(out, &format!("Error: {err}")).await?,
            }
        }
        Some(AttendanceCommand::Back) => {
            if let Err(err) = shell.close_attendance() {
                notice(out, &err.to_string()).await?;
            }
        }
        Some(AttendanceCommand::Quit) => return Ok(false),
        None => notice(out, "Unknown command").await?,
    }
    Ok(true)
}
