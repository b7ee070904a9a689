//! Console Entry Point
//!
//! Line-driven front end for the PIN gate and the chama wallet.
//! Uses `anyhow` for startup errors, but gate and wallet errors
//! keep their own types until `report` prints them.

mod command;
mod report;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use kernel::id::ChamaId;
use pin_gate::domain::{
    IdentityProvider, PinSetupService, PinStatusLookup, PinVerifier, ProfileDirectory,
};
use pin_gate::infra::{
    InMemoryPinStore, InMemoryProfileDirectory, RestIdentityProvider, RestPinService,
    RestProfileDirectory, StaticIdentityProvider,
};
use pin_gate::{GateConfig, GateDecision, GatePhase, Identity, PinGate, ProfileSync};
use platform::config::BackendConfig;
use platform::http::BackendClient;
use platform::inactivity::InputKind;
use platform::notify::{MemorySink, NotificationSink, TracingSink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet::domain::entities::{ContributionRequest, WalletBalances, WalletOperation};
use wallet::domain::gateway::WalletGateway;
use wallet::domain::services::parse_recipient;
use wallet::domain::value_objects::{Amount, PaymentMethod, WalletType};
use wallet::infra::{InMemoryWalletGateway, RestWalletGateway};
use wallet::domain::leaderboard::LeaderboardSort;
use wallet::{ContributionUseCase, LeaderboardUseCase, WalletOpsUseCase};

use crate::command::{Command, HELP};

fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "console=info,pin_gate=info,platform=info,wallet=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Event handling stays on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(start())
}

async fn start() -> anyhow::Result<()> {
    let gate_config = Arc::new(gate_config()?);
    let chama_id = match env::var("CHAMA_ID") {
        Ok(raw) => raw.parse::<ChamaId>().context("CHAMA_ID must be a UUID")?,
        Err(_) => ChamaId::new(),
    };

    let sink = Arc::new(MemorySink::new());
    let notifier: Arc<dyn NotificationSink> = sink.clone();

    if env::var("BACKEND_URL").is_ok() {
        let mut client = BackendClient::new(BackendConfig::from_env()?)?;
        if let Ok(token) = env::var("BACKEND_ACCESS_TOKEN") {
            client = client.with_access_token(token);
        }
        tracing::info!(backend = %client.config().base_url, "Using hosted backend");

        let gate = PinGate::new(
            Arc::new(RestIdentityProvider::new(client.clone())),
            Arc::new(RestPinService::new(client.clone())),
            notifier.clone(),
            gate_config,
        );
        let profiles = Arc::new(RestProfileDirectory::new(client.clone()));
        let gateway = Arc::new(RestWalletGateway::new(client));
        Console::new(gate, profiles, gateway, notifier, sink, chama_id)
            .run()
            .await
    } else {
        tracing::info!("BACKEND_URL not set, using in-memory services");

        let store = match env::var("PIN_PEPPER") {
            Ok(pepper) => InMemoryPinStore::with_pepper(pepper),
            Err(_) => InMemoryPinStore::new(),
        };
        let gate = PinGate::new(
            Arc::new(StaticIdentityProvider::default()),
            Arc::new(store),
            notifier.clone(),
            gate_config,
        );
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let gateway = Arc::new(
            InMemoryWalletGateway::new()
                .with_balances(chama_id, WalletBalances::new(0.0, 5_000.0))
                .await,
        );
        Console::new(gate, profiles, gateway, notifier, sink, chama_id)
            .run()
            .await
    }
}

fn gate_config() -> anyhow::Result<GateConfig> {
    let config = if cfg!(debug_assertions) {
        GateConfig::development()
    } else {
        GateConfig::default()
    };

    match env::var("GATE_IDLE_TIMEOUT_SECS") {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .context("GATE_IDLE_TIMEOUT_SECS must be a whole number of seconds")?;
            Ok(config.with_idle_timeout(Duration::from_secs(secs)))
        }
        Err(_) => Ok(config),
    }
}

struct Console<I, P, D, G>
where
    I: IdentityProvider,
    P: PinStatusLookup + PinVerifier + PinSetupService,
    D: ProfileDirectory,
    G: WalletGateway,
{
    gate: PinGate<I, P>,
    profiles: ProfileSync<D>,
    gateway: Arc<G>,
    wallet_ops: WalletOpsUseCase<G>,
    contributions: ContributionUseCase<G>,
    leaderboard: LeaderboardUseCase<G>,
    sink: Arc<MemorySink>,
    chama_id: ChamaId,
}

impl<I, P, D, G> Console<I, P, D, G>
where
    I: IdentityProvider,
    P: PinStatusLookup + PinVerifier + PinSetupService,
    D: ProfileDirectory,
    G: WalletGateway,
{
    fn new(
        gate: PinGate<I, P>,
        profiles: Arc<D>,
        gateway: Arc<G>,
        notifier: Arc<dyn NotificationSink>,
        sink: Arc<MemorySink>,
        chama_id: ChamaId,
    ) -> Self {
        Self {
            gate,
            profiles: ProfileSync::new(profiles),
            leaderboard: LeaderboardUseCase::new(gateway.clone()),
            wallet_ops: WalletOpsUseCase::new(gateway.clone(), notifier.clone()),
            contributions: ContributionUseCase::new(gateway.clone(), notifier),
            gateway,
            sink,
            chama_id,
        }
    }

    async fn run(mut self) -> anyhow::Result<()> {
        let mut monitor = self.gate.spawn_inactivity_monitor();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        match self.gate.restore_session().await {
            Ok(_) => self.sync_profile().await,
            Err(e) => tracing::warn!(error = %e, "Could not restore session"),
        }
        println!("{HELP}");
        self.show_state();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    monitor.record(InputKind::Key);

                    match command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => {
                            if let Err(e) = self.handle(command).await {
                                println!("{}", report::render(&e));
                            }
                        }
                        Ok(None) => {}
                        Err(e) => println!("{}", report::render(&e)),
                    }
                }
                Some(timeout) = monitor.next_timeout() => {
                    tracing::info!(idle_secs = timeout.idle_for.as_secs(), "Member idle");
                    self.gate.on_inactivity_timeout().await;
                }
            }

            for notification in self.sink.drain() {
                println!("{notification}");
                TracingSink.notify(notification);
            }
            self.show_state();
        }

        Ok(())
    }

    async fn handle(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::SignIn { user_id, email } => {
                let identity = match email {
                    Some(email) => Identity::new(user_id).with_email(email),
                    None => Identity::new(user_id),
                };
                println!("welcome, {}", identity.display_name());
                self.gate.sign_in(identity).await;
                self.sync_profile().await;
            }
            Command::SignOut => {
                self.gate.sign_out().await;
                self.profiles.on_sign_out();
            }
            Command::Go(path) => self.gate.navigate(path).await,
            Command::Verify(pin) => {
                if !self.gate.verify_attempt(&pin).await? {
                    println!("incorrect PIN");
                }
            }
            Command::Setup { pin, confirm } => self.gate.submit_setup(&pin, &confirm).await?,
            Command::Dismiss => match self.gate.decision() {
                GateDecision::ShowVerify => self.gate.dismiss_verification().await,
                GateDecision::ShowSetup => self.gate.dismiss_setup().await,
                GateDecision::None => println!("nothing to dismiss"),
            },
            Command::Status => {
                let state = self.gate.state();
                let session = state.session();
                println!(
                    "member={} admin={} pin_setup={} verified={} idle_timeout={}s",
                    state.identity().map(|i| i.display_name()).unwrap_or("-"),
                    self.profiles.is_admin(),
                    session.has_pin_setup,
                    session.pin_verified,
                    self.gate.config().idle_timeout.as_secs(),
                );
            }
            Command::Balance => {
                let balances = self.balances().await?;
                println!("savings={:.2} mgr={:.2}", balances.savings, balances.mgr);
            }
            Command::TopUp { amount } => {
                let op = WalletOperation::TopUp {
                    chama_id: self.chama_id,
                    amount: Amount::parse(&amount)?,
                    wallet_type: WalletType::Savings,
                    payment_method: Some(PaymentMethod::Mpesa),
                };
                self.run_wallet_op(op).await?;
            }
            Command::Withdraw { amount, phone } => {
                let op = WalletOperation::Withdraw {
                    chama_id: self.chama_id,
                    amount: Amount::parse(&amount)?,
                    payment_method: PaymentMethod::Mpesa,
                    phone_number: phone,
                };
                self.run_wallet_op(op).await?;
            }
            Command::Send { amount, recipient } => {
                let op = WalletOperation::Send {
                    chama_id: self.chama_id,
                    amount: Amount::parse(&amount)?,
                    recipient: parse_recipient(&recipient)?,
                };
                self.run_wallet_op(op).await?;
            }
            Command::Contribute { amount } => {
                self.ensure_verified()?;
                let request = ContributionRequest::new(
                    self.chama_id,
                    Amount::parse(&amount)?,
                    PaymentMethod::Mpesa,
                );
                let receipt = self.contributions.execute(request).await?;
                tracing::debug!(refresh = ?receipt.refresh, "Views to reload");
            }
            Command::Leaderboard(sort) => self.show_leaderboard(sort).await?,
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }

    async fn sync_profile(&self) {
        if let Some(identity) = self.gate.state().identity() {
            let identity = identity.clone();
            self.profiles.on_sign_in(&identity).await;
        }
    }

    async fn show_leaderboard(&self, sort: LeaderboardSort) -> anyhow::Result<()> {
        self.ensure_verified()?;
        let entries = self.leaderboard.execute(self.chama_id, sort).await?;
        if entries.is_empty() {
            println!("no active members");
        }
        for entry in entries {
            let member = &entry.standing;
            println!(
                "{:>3}. {:<32} {:<10} contributed={:.2} savings={:.2}",
                entry.rank,
                member.display_name(),
                member.role,
                member.total_contributed,
                member.savings_balance,
            );
        }
        Ok(())
    }

    async fn run_wallet_op(&self, op: WalletOperation) -> anyhow::Result<()> {
        self.ensure_verified()?;
        let balances = self.balances().await?;
        let receipt = self.wallet_ops.execute(op, &balances).await?;
        tracing::debug!(refresh = ?receipt.refresh, "Views to reload");
        Ok(())
    }

    async fn balances(&self) -> anyhow::Result<WalletBalances> {
        let Some(identity) = self.gate.state().identity() else {
            bail!("sign in first");
        };
        Ok(self
            .gateway
            .fetch_balances(self.chama_id, identity.user_id)
            .await?)
    }

    /// Money movements need a verified PIN
    fn ensure_verified(&self) -> anyhow::Result<()> {
        if self.gate.phase() != GatePhase::Verified {
            bail!("PIN verification required");
        }
        Ok(())
    }

    fn show_state(&self) {
        let prompt = match self.gate.decision() {
            GateDecision::ShowSetup => " [set up your PIN: setup <pin> <confirm>]",
            GateDecision::ShowVerify => " [verify your PIN: verify <pin>]",
            GateDecision::None => "",
        };
        println!(
            "{} {}{}",
            self.gate.phase(),
            self.gate.state().route(),
            prompt
        );
    }
}
