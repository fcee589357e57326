//! Terminal front-end for the supply-chain assistant.

mod commands;
mod terminal;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use supplychat::render::user_line;
use supplychat::types::RegisterRequest;
use supplychat::{
    render_message, toggle_speech, DashboardConfig, HttpQueryClient, InMemorySynthesizer,
    MessageRole, Session, SessionEvent, SessionState, SpeechState, SpeechSynthesizer, UserProfile,
};

use commands::{Command, HELP};
use terminal::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "supplychat", version, about = "Chat with the supply-chain assistant")]
struct Args {
    /// JSON config file (defaults to <config_dir>/supplychat/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Sign in with this account before the first query
    #[arg(long, requires = "password")]
    email: Option<String>,

    #[arg(long, env = "SUPPLYCHAT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Create the account first, then sign in with it
    #[arg(long, requires_all = ["email", "name", "role", "region"])]
    register: bool,

    /// Display name for --register
    #[arg(long)]
    name: Option<String>,

    /// Role for --register, e.g. "Analyst"
    #[arg(long)]
    role: Option<String>,

    /// Region for --register, e.g. "EMEA"
    #[arg(long)]
    region: Option<String>,
}

impl Args {
    /// Registration payload when `--register` was given with every field.
    fn registration(&self) -> Option<RegisterRequest> {
        if !self.register {
            return None;
        }
        Some(RegisterRequest {
            name: self.name.clone()?,
            email: self.email.clone()?,
            password: self.password.clone()?,
            role: self.role.clone()?,
            region: self.region.clone()?,
        })
    }
}

struct Console {
    session: Session,
    config: DashboardConfig,
    renderer: TerminalRenderer,
    speech: InMemorySynthesizer,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = args.api_url.clone() {
        config.api.base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    let client = Arc::new(HttpQueryClient::new(&config.api).context("Failed to create client")?);

    let mut state = SessionState::from_config(&config);
    state.set_user(sign_in(&client, &args).await);

    let (tx, mut events) = mpsc::unbounded_channel();
    let session = Session::new(client, state).with_events(tx);

    let history_session = session.clone();
    tokio::spawn(async move {
        history_session.load_history().await;
    });

    let mut console = Console::new(session, config);

    println!("{}", console.sidebar_text());
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match commands::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => console.handle(command),
                    Err(err) => println!("{}", err),
                }
            }
            Some(event) = events.recv() => {
                if let Some(text) = console.describe(event) {
                    println!("{}", text);
                }
            }
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

/// Optional registration followed by sign-in. Failures leave the session anonymous.
async fn sign_in(client: &HttpQueryClient, args: &Args) -> Option<UserProfile> {
    if let Some(request) = args.registration() {
        match client.register(&request).await {
            Ok(response) => {
                tracing::info!(user_id = response.user_id, "{}", response.message)
            }
            Err(err) => tracing::warn!(error = %err, "Registration failed"),
        }
    }

    let (email, password) = (args.email.as_deref()?, args.password.as_deref()?);
    match client.login(email, password).await {
        Ok(response) => Some(response.user),
        Err(err) => {
            tracing::warn!(error = %err, "Sign-in failed, continuing without a user");
            None
        }
    }
}

impl Console {
    fn new(session: Session, config: DashboardConfig) -> Self {
        Self {
            renderer: TerminalRenderer::new(&config.display),
            session,
            config,
            speech: InMemorySynthesizer::new(),
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Ask(text) => {
                self.session.lock().set_input(text);
                self.session.submit();
            }
            Command::Send => {
                if self.session.submit().is_none() {
                    println!("Nothing to send.");
                }
            }
            Command::Suggest(n) => match self.latest_suggestion(n) {
                Some(text) => {
                    self.session.submit_text(&text);
                }
                None => println!("No suggestion {} in the latest answer.", n),
            },
            Command::Pick(n) => match self.pick(n) {
                Some(text) => {
                    println!("Input: {}", text);
                    println!("(press Enter to send)");
                }
                None => println!("No sidebar entry {}.", n),
            },
            Command::Speak => self.speak(),
            Command::Clear => self.session.clear(),
            Command::History => {
                let state = self.session.lock();
                if state.history().is_empty() {
                    println!("No queries yet.");
                }
                for (i, query) in state.history().iter().enumerate() {
                    println!("{:>2}. {}", i + 1, query);
                };
            }
            Command::Sidebar => println!("{}", self.sidebar_text()),
            Command::ToggleSidebar => {
                self.session.lock().toggle_sidebar();
                println!("{}", self.sidebar_text());
            }
            Command::ToggleSql => {
                self.renderer.expand_sql = !self.renderer.expand_sql;
                let shown = if self.renderer.expand_sql { "shown" } else { "hidden" };
                println!("SQL blocks {}.", shown);
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    /// Text to print for a session event, if any.
    fn describe(&self, event: SessionEvent) -> Option<String> {
        match event {
            // User lines were already typed at the prompt
            SessionEvent::MessageAppended(message) if message.role == MessageRole::User => None,
            SessionEvent::MessageAppended(message) => {
                Some(self.renderer.render(&render_message(&message)))
            }
            SessionEvent::LoadingChanged(true) => Some("... thinking".to_string()),
            SessionEvent::LoadingChanged(false) => None,
            SessionEvent::HistorySeeded(count) => {
                tracing::debug!(count, "History available in sidebar");
                Some(self.sidebar_text())
            }
            SessionEvent::Cleared => Some("Conversation cleared.".to_string()),
        }
    }

    fn latest_suggestion(&self, n: usize) -> Option<String> {
        let state = self.session.lock();
        let message = state
            .log()
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)?;
        let suggestion = message.suggestions().nth(n - 1).cloned();
        suggestion
    }

    /// Prefill the input with sidebar entry `n` (1-based).
    fn pick(&self, n: usize) -> Option<String> {
        let mut state = self.session.lock();
        let sidebar = state.sidebar(
            &self.config.sample_questions,
            self.config.display.sidebar_label_width,
        );
        let text = sidebar.entry(n - 1)?.full.clone();
        state.prefill(&text);
        Some(text)
    }

    fn speak(&self) {
        let text = {
            let state = self.session.lock();
            let content = state
                .log()
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::Assistant)
                .map(|m| m.content.clone());
            content
        };
        let Some(text) = text else {
            println!("Nothing to read yet.");
            return;
        };
        match toggle_speech(Some(&self.speech as &dyn SpeechSynthesizer), &text) {
            SpeechState::Speaking => println!("(speaking)"),
            SpeechState::Idle => println!("(stopped)"),
        }
    }

    fn sidebar_text(&self) -> String {
        let state = self.session.lock();
        let sidebar = state.sidebar(
            &self.config.sample_questions,
            self.config.display.sidebar_label_width,
        );
        let user = state.user().map(user_line);
        let text = self.renderer.render_sidebar(&sidebar, user.as_deref());
        text
    }
}
