use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::errors::CoreError;
use crate::models::chart::AnnotationKind;
use crate::models::mutation::{MutationKind, MutationOutcome};
use crate::models::notice::Notice;
use crate::models::projection::Projection;
use crate::models::purchase::{Purchase, PurchaseForm, PurchaseId};
use crate::models::settings::{MarketMode, Settings};
use crate::models::ticker::TickerSnapshot;
use crate::providers::traits::DashboardBackend;
use crate::PurchaseDashboard;

/// A user action or refresh request for the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Refetch the purchase list for the current market.
    RefreshPurchases,
    /// Poll the ticker now, outside the regular interval.
    RefreshTicker,
    /// Load the market directory (once per session).
    LoadMarkets,
    SelectMarket(String),
    AddMarket(String),
    SetIncluded { id: PurchaseId, included: bool },
    FilterByDate { start: String, end: String },
    ClearDateFilter,
    CreatePurchase(PurchaseForm),
    UpdatePurchase { id: PurchaseId, form: PurchaseForm },
    DeletePurchase(PurchaseId),
    HoverAnnotation { kind: AnnotationKind, hovered: bool },
    /// Stop the run loop. In-flight requests are abandoned.
    Shutdown,
}

/// Output for the rendering layer.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// State changed; here is the new projection.
    Recomputed(Arc<Projection>),
    Notice(Notice),
}

/// Result of a backend call, posted back into the queue.
#[derive(Debug)]
enum Completion {
    Purchases(Result<Vec<Purchase>, CoreError>),
    Ticker(Result<TickerSnapshot, CoreError>),
    Markets(Result<Vec<String>, CoreError>),
    Mutation {
        kind: MutationKind,
        result: Result<MutationOutcome, CoreError>,
    },
}

#[derive(Debug)]
enum Message {
    Command(Command),
    Completion(Completion),
}

/// Cloneable sender side handed to the UI.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::UnboundedSender<Message>,
    projection: watch::Receiver<Arc<Projection>>,
}

impl DashboardHandle {
    pub fn send(&self, command: Command) -> Result<(), CoreError> {
        self.tx.send(Message::Command(command))?;
        Ok(())
    }

    /// The most recently published projection.
    #[must_use]
    pub fn projection(&self) -> Arc<Projection> {
        self.projection.borrow().clone()
    }

    /// A receiver that wakes on every published projection.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Projection>> {
        self.projection.clone()
    }
}

/// Coordinates refresh cycles on a single logical thread.
///
/// Every user action and every backend completion is a message on one
/// queue, handled to completion before the next. Backend calls run as
/// spawned tasks and may complete in any order; each completion
/// overwrites its slice of state (last completed wins, no fencing).
/// A successful mutation is always followed by a full purchase refetch.
pub struct SyncOrchestrator<B: DashboardBackend + ?Sized + 'static> {
    dashboard: PurchaseDashboard,
    backend: Arc<B>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    events: mpsc::UnboundedSender<DashboardEvent>,
    projection_tx: watch::Sender<Arc<Projection>>,
    in_flight: usize,
    ticker_interval: Duration,
}

impl<B: DashboardBackend + ?Sized + 'static> SyncOrchestrator<B> {
    /// Build an orchestrator, its UI handle and the event stream.
    ///
    /// The event channel is unbounded: a `Recomputed` event is queued on every
    /// ticker poll. Callers must either keep draining the returned receiver or
    /// drop it; a UI that only reads [`DashboardHandle::projection`] should
    /// drop it right away.
    pub fn new(
        settings: Settings,
        backend: Arc<B>,
    ) -> Result<(Self, DashboardHandle, mpsc::UnboundedReceiver<DashboardEvent>), CoreError> {
        let ticker_interval = settings.ticker_interval();
        let dashboard = PurchaseDashboard::new(settings)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, events_rx) = mpsc::unbounded_channel();
        let (projection_tx, projection_rx) =
            watch::channel(Arc::new(dashboard.projection().clone()));

        let handle = DashboardHandle {
            tx: tx.clone(),
            projection: projection_rx,
        };

        let orchestrator = Self {
            dashboard,
            backend,
            tx,
            rx,
            events,
            projection_tx,
            in_flight: 0,
            ticker_interval,
        };
        Ok((orchestrator, handle, events_rx))
    }

    pub fn dashboard(&self) -> &PurchaseDashboard {
        &self.dashboard
    }

    /// Number of backend requests whose completion has not been handled yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Initial loads: market directory (multi-market) and purchases.
    /// The first ticker poll comes from the interval's immediate tick.
    pub fn bootstrap(&mut self) {
        if self.dashboard.mode() == MarketMode::Multi {
            self.dispatch(Command::LoadMarkets);
        }
        self.dispatch(Command::RefreshPurchases);
    }

    /// Run until `Command::Shutdown`: bootstrap, then serve the queue and
    /// poll the ticker every interval.
    pub async fn run(mut self) {
        log::info!(
            "Dashboard sync started (backend: {}, ticker every {:?})",
            self.backend.name(),
            self.ticker_interval
        );
        self.bootstrap();

        let mut ticker = tokio::time::interval(self.ticker_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = self.rx.recv() => {
                    match message {
                        Some(message) => {
                            if !self.process(message) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.fetch_ticker();
                }
            }
        }

        log::info!("Dashboard sync stopped ({} request(s) abandoned)", self.in_flight);
    }

    /// Handle one command immediately. Returns `false` for `Shutdown`.
    pub fn dispatch(&mut self, command: Command) -> bool {
        self.process(Message::Command(command))
    }

    /// Wait until every in-flight request has completed and been applied,
    /// including the refetches those completions trigger. Commands queued
    /// meanwhile are processed too.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(message) => {
                    if !self.process(message) {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    // ── Message handling ────────────────────────────────────────────

    fn process(&mut self, message: Message) -> bool {
        match message {
            Message::Command(command) => self.handle_command(command),
            Message::Completion(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.handle_completion(completion);
                true
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::RefreshPurchases => self.fetch_purchases(),
            Command::RefreshTicker => self.fetch_ticker(),
            Command::LoadMarkets => self.fetch_markets(),
            Command::SelectMarket(id) => match self.dashboard.select_market(&id) {
                Ok(true) => self.after_market_switch(),
                Ok(false) => log::debug!("Market {id} already active"),
                Err(e) => self.reject(e),
            },
            Command::AddMarket(id) => match self.dashboard.add_market(&id) {
                Ok(true) => self.after_market_switch(),
                Ok(false) => self.publish(),
                Err(e) => self.reject(e),
            },
            Command::SetIncluded { id, included } => {
                match self.dashboard.set_included(&id, included) {
                    Ok(()) => self.publish(),
                    Err(e) => self.reject(e),
                }
            }
            Command::FilterByDate { start, end } => {
                match self.dashboard.filter_by_date(&start, &end) {
                    Ok(()) => self.publish(),
                    Err(e) => self.reject(e),
                }
            }
            Command::ClearDateFilter => {
                self.dashboard.clear_date_filter();
                self.publish();
            }
            Command::CreatePurchase(form) => self.create_purchase(form),
            Command::UpdatePurchase { id, form } => self.update_purchase(id, form),
            Command::DeletePurchase(id) => self.delete_purchase(id),
            Command::HoverAnnotation { kind, hovered } => {
                self.dashboard.hover_annotation(kind, hovered);
                self.publish();
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Purchases(Ok(records)) => {
                log::debug!("Applying {} fetched purchase(s)", records.len());
                self.dashboard.replace_purchases(records);
                self.publish();
            }
            Completion::Ticker(Ok(ticker)) => {
                log::debug!("Applying ticker for {}: last {}", ticker.market, ticker.last);
                self.dashboard.update_ticker(ticker);
                self.publish();
            }
            Completion::Markets(Ok(markets)) => {
                log::debug!("Market directory loaded ({} market(s))", markets.len());
                self.dashboard.set_known_markets(markets);
                self.publish();
            }
            Completion::Markets(Err(e)) => {
                self.dashboard.market_loading_failed();
                self.fail(e);
            }
            Completion::Mutation { kind, result } => self.apply_mutation(kind, result),
            Completion::Purchases(Err(e)) | Completion::Ticker(Err(e)) => self.fail(e),
        }
    }

    fn apply_mutation(&mut self, kind: MutationKind, result: Result<MutationOutcome, CoreError>) {
        match result {
            Ok(MutationOutcome::Applied) => {
                log::info!("{kind} applied");
                self.notify(Notice::success("Great success!"));
                self.fetch_purchases();
            }
            Ok(MutationOutcome::Unchanged) => {
                self.notify(Notice::info("Data has no changes"));
            }
            Ok(MutationOutcome::Invalid) => {
                log::warn!("{kind} rejected by backend as invalid");
                self.notify(Notice::warning("Invalid input!"));
            }
            Err(e) => self.fail(e),
        }
    }

    // ── Requests ────────────────────────────────────────────────────

    fn after_market_switch(&mut self) {
        self.publish();
        self.fetch_purchases();
        self.fetch_ticker();
    }

    fn fetch_purchases(&mut self) {
        let market = self.dashboard.purchases_market();
        if self.dashboard.mode() == MarketMode::Multi && market.is_none() {
            log::debug!("No active market; skipping purchase fetch");
            return;
        }
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            Completion::Purchases(backend.list_purchases(market.as_deref()).await)
        });
    }

    fn fetch_ticker(&mut self) {
        let Some(market) = self.dashboard.ticker_market() else {
            log::debug!("No active market; skipping ticker poll");
            return;
        };
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move { Completion::Ticker(backend.get_ticker(&market).await) });
    }

    fn fetch_markets(&mut self) {
        if !self.dashboard.begin_market_loading() {
            log::debug!("Market directory already loaded or loading");
            return;
        }
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move { Completion::Markets(backend.list_markets().await) });
    }

    fn create_purchase(&mut self, form: PurchaseForm) {
        let mut input = match form.parse() {
            Ok(input) => input,
            Err(e) => return self.reject(e),
        };
        if self.dashboard.mode() == MarketMode::Multi && input.market.is_none() {
            input.market = self.dashboard.ticker_market();
        }
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            let result = backend.create_purchase(&input).await;
            Completion::Mutation {
                kind: MutationKind::Create,
                result,
            }
        });
    }

    fn update_purchase(&mut self, id: PurchaseId, form: PurchaseForm) {
        if self.dashboard.purchase(&id).is_none() {
            return self.reject(CoreError::PurchaseNotFound(id.to_string()));
        }
        let input = match form.parse() {
            Ok(input) => input,
            Err(e) => return self.reject(e),
        };
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            let result = backend.update_purchase(&id, &input).await;
            Completion::Mutation {
                kind: MutationKind::Update,
                result,
            }
        });
    }

    fn delete_purchase(&mut self, id: PurchaseId) {
        if self.dashboard.purchase(&id).is_none() {
            return self.reject(CoreError::PurchaseNotFound(id.to_string()));
        }
        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            let result = backend.delete_purchase(&id).await;
            Completion::Mutation {
                kind: MutationKind::Delete,
                result,
            }
        });
    }

    fn spawn_request<F>(&mut self, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = request.await;
            if tx.send(Message::Completion(completion)).is_err() {
                log::debug!("Dashboard stopped before a request completed");
            }
        });
    }

    // ── Output ──────────────────────────────────────────────────────

    fn publish(&self) {
        let projection = Arc::new(self.dashboard.projection().clone());
        self.projection_tx.send_replace(Arc::clone(&projection));
        // Fails only when the event receiver was dropped.
        let _ = self.events.send(DashboardEvent::Recomputed(projection));
    }

    fn notify(&self, notice: Notice) {
        let _ = self.events.send(DashboardEvent::Notice(notice));
    }

    /// Input the user has to fix. Nothing was changed.
    fn reject(&self, error: CoreError) {
        log::warn!("Rejected: {error}");
        self.notify(Notice::from_error(&error));
    }

    /// Transport or backend failure. State and projection stay as they were.
    fn fail(&self, error: CoreError) {
        log::error!("Backend request failed: {error}");
        self.notify(Notice::from_error(&error));
    }
}
