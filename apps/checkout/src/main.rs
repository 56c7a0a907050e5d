use std::{io::Write as _, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use checkout_core::{
    with_recipient_name, CheckoutEvent, CheckoutPage, CheckoutServices, HttpIntakeClient,
    IntakeClient, SessionStore, SubmissionReceipt,
};
use clap::{Parser, Subcommand};
use shared::domain::{SessionId, SAMPLE_SONGS};
use storage::{MemorySessionStore, SqliteSessionStore};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
    time::Instant,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod clips;
mod commands;
mod config;
mod navigator;
mod screens;

use commands::{Command, ParseError};
use config::Settings;
use navigator::{ConsoleNavigator, Departure};

const SAMPLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "checkout", about = "CantodeFe order checkout")]
struct Args {
    /// Recipient name handed over by the previous page.
    #[arg(long)]
    recipient_name: Option<String>,
    /// Full page location; its `recipientName` query seeds the form.
    #[arg(long, conflicts_with = "recipient_name")]
    location: Option<Url>,
    /// Resume a session instead of starting a new one.
    #[arg(long)]
    session: Option<SessionId>,
    /// Settings file, `checkout.toml` by default.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep stored fields when quitting.
    #[arg(long)]
    keep_session: bool,
    #[command(subcommand)]
    screen: Option<Screen>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    /// Order review and payment handoff (default).
    Checkout,
    /// Confirmation shown after payment.
    ThankYou,
}

enum Flow {
    Continue,
    Reload,
    Quit,
}

struct Services {
    store: Arc<dyn SessionStore>,
    intake: Arc<dyn IntakeClient>,
    navigator: Arc<ConsoleNavigator>,
    payment_url: Url,
    sample_preview: Duration,
}

impl Services {
    async fn open_page(&self, location: Url) -> CheckoutPage {
        CheckoutPage::open(
            location,
            CheckoutServices {
                store: Arc::clone(&self.store),
                intake: Arc::clone(&self.intake),
                navigator: self.navigator.clone(),
                payment_url: self.payment_url.clone(),
            },
            clips::preview_clips(&SAMPLE_SONGS, self.sample_preview),
        )
        .await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.screen.unwrap_or(Screen::Checkout) {
        Screen::ThankYou => {
            println!("{}", screens::confirmation());
            Ok(())
        }
        Screen::Checkout => run_checkout(args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_checkout(args: Args) -> Result<()> {
    let settings = config::load_settings(args.config.as_deref());
    let session_id = args.session.unwrap_or_else(SessionId::generate);

    let mut location = match args.location {
        Some(location) => location,
        None => settings.page_location()?,
    };
    if let Some(name) = args.recipient_name.as_deref() {
        location = with_recipient_name(&location, name);
    }

    let services = Services {
        store: open_store(&settings, session_id).await,
        intake: Arc::new(HttpIntakeClient::new(settings.intake_endpoint()?)?),
        navigator: Arc::new(ConsoleNavigator::new(location.clone())),
        payment_url: settings.payment_location()?,
        sample_preview: settings.sample_preview(),
    };
    info!(session_id = %session_id, "checkout session started");
    println!("Sesión {session_id} · escribe help para ver los comandos");

    let mut page = services.open_page(location).await;
    let mut events = page.subscribe_events();
    println!("{}", screens::checkout(&page, today()));

    let mut receipts = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(SAMPLE_POLL_INTERVAL);
    let mut tab_closed = true;
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    break;
                };
                match on_line(&mut page, &line, &mut receipts).await? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                    Flow::Reload => {
                        page = services.open_page(services.navigator.location()).await;
                        events = page.subscribe_events();
                        println!("{}", screens::checkout(&page, today()));
                    }
                }
                print_events(&mut events);
                if services.navigator.departure().is_none() {
                    prompt();
                }
            }
            _ = ticker.tick() => {
                page.poll_samples();
                print_events(&mut events);
            }
        }

        match services.navigator.departure() {
            Some(Departure::External(url)) => {
                println!("Completa tu pago en {url}");
                tab_closed = false;
                break;
            }
            Some(Departure::Back) => {
                tab_closed = false;
                break;
            }
            None => {}
        }
    }

    settle_intake(receipts, settings.handoff_grace()).await;

    if tab_closed && !args.keep_session {
        if let Err(err) = services.store.clear().await {
            debug!(error = %format!("{err:#}"), "session clear skipped");
        }
    } else {
        println!("Para retomar: checkout --session {session_id}");
    }
    Ok(())
}

async fn on_line(
    page: &mut CheckoutPage,
    line: &str,
    receipts: &mut Vec<SubmissionReceipt>,
) -> Result<Flow> {
    let command = match commands::parse(line) {
        Ok(command) => command,
        Err(ParseError::Empty) => return Ok(Flow::Continue),
        Err(err) => {
            println!("{err}");
            return Ok(Flow::Continue);
        }
    };

    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Reload => return Ok(Flow::Reload),
        Command::Show => println!("{}", screens::checkout(page, today())),
        Command::Edit => {
            page.open_editor();
            println!("{}", screens::editor(page.preferences()));
        }
        Command::Set { field, value } => {
            page.update_field(field, &value).await;
            if page.is_editor_open() {
                println!("{}", screens::editor(page.preferences()));
            }
        }
        Command::Save => page.save_changes().await,
        Command::Cancel => page.cancel_editor(),
        Command::Submit => {
            // failures surface as notices on the event channel
            if let Ok(receipt) = page.submit() {
                receipts.push(receipt);
            }
        }
        Command::Play(index) => {
            if let Err(err) = page.toggle_sample(index) {
                println!("{}", err.user_message());
            }
        }
        Command::Samples => println!(
            "{}",
            screens::samples(&SAMPLE_SONGS, page.currently_playing())
        ),
        Command::Back => page.go_back(),
        Command::Dump => println!("{}", serde_json::to_string_pretty(page.preferences())?),
        Command::Help => println!("{}", commands::HELP),
    }
    Ok(Flow::Continue)
}

fn print_events(events: &mut broadcast::Receiver<CheckoutEvent>) {
    loop {
        match events.try_recv() {
            Ok(CheckoutEvent::Notice(notice)) => println!("{}", screens::notice(&notice)),
            Ok(CheckoutEvent::EditorClosed) => println!("Formulario cerrado"),
            Ok(CheckoutEvent::PlaybackChanged(Some(index))) => {
                if let Some(song) = SAMPLE_SONGS.get(index) {
                    println!("❚❚ Reproduciendo «{}»", song.title);
                }
            }
            Ok(CheckoutEvent::PlaybackChanged(None)) => println!("▶ Reproducción detenida"),
            Ok(CheckoutEvent::LocationChanged(location)) => {
                debug!(location = %location, "location synced")
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "checkout events dropped")
            }
            Err(_) => break,
        }
    }
}

/// Gives in-flight intake requests a bounded chance to finish before exit.
async fn settle_intake(receipts: Vec<SubmissionReceipt>, grace: Duration) {
    let deadline = Instant::now() + grace;
    for receipt in receipts {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !receipt.settle(remaining).await {
            warn!("intake request still in flight at exit; abandoning it");
        }
    }
}

async fn open_store(settings: &Settings, session_id: SessionId) -> Arc<dyn SessionStore> {
    match open_sqlite_store(settings, session_id).await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!(
                error = %format!("{err:#}"),
                "session database unavailable; keeping this session in memory"
            );
            Arc::new(MemorySessionStore::new())
        }
    }
}

async fn open_sqlite_store(settings: &Settings, session_id: SessionId) -> Result<SqliteSessionStore> {
    let database_url = config::normalize_database_url(&settings.session_database_url);
    let store = SqliteSessionStore::new(&database_url, session_id).await?;
    match store.prune_older_than(settings.session_retention()).await {
        Ok(0) => {}
        Ok(pruned) => info!(pruned, "stale session entries removed"),
        Err(err) => debug!(error = %format!("{err:#}"), "session pruning skipped"),
    }
    Ok(store)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
