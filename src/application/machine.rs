use crate::application::payment::PaymentProcessor;
use crate::domain::catalog::{default_drinks, Catalog, Drink};
use crate::domain::history::TransactionSummary;
use crate::domain::inventory::{default_inventory, InventoryLedger, InventorySlot};
use crate::domain::money::{format_won, ChangeBank, Denomination};
use crate::domain::ports::{
    AuthorizationOptions, AuthorizationOutcome, CardAuthorizerBox, CardOutcome,
};
use crate::domain::state::{
    reduce, MachineEvent, MachineState, MachineStatus, PaymentMethod,
};
use crate::error::{Result, VendingError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 16;

/// Tunable constants of a machine instance. Everything timed or seeded comes
/// in here rather than being hardcoded; the demo binary deserializes this
/// from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub drinks: Vec<Drink>,
    pub inventory: Vec<InventorySlot>,
    pub bank_seed: ChangeBank,
    pub dispense_delay_ms: u64,
    pub refund_delay_ms: u64,
    pub refund_display_delay_ms: u64,
    pub auto_reset_delay_ms: u64,
    pub card_delay_ms: u64,
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            drinks: default_drinks(),
            inventory: default_inventory(),
            bank_seed: ChangeBank::default_seed(),
            dispense_delay_ms: 1200,
            refund_delay_ms: 1200,
            refund_display_delay_ms: 10_000,
            auto_reset_delay_ms: 10_000,
            card_delay_ms: 1200,
            history_capacity: 20,
        }
    }
}

/// Customer or operator intents accepted by the machine.
#[derive(Debug)]
enum Intent {
    SelectDrink(String),
    ChoosePaymentMethod(PaymentMethod),
    InsertCash(Denomination),
    AuthorizeCard(Option<CardOutcome>),
    Cancel,
    Reset,
    EnterMaintenance,
    ExitMaintenance,
    ReportDispenseFailure(Option<String>),
    SetCardSimulationMode(CardOutcome),
    SetStock { drink_id: String, amount: u32 },
    Restock { drink_id: String, amount: u32 },
}

enum Command {
    Intent {
        intent: Intent,
        reply: oneshot::Sender<Result<MachineState>>,
    },
    GetState(oneshot::Sender<MachineState>),
    GetInventory(oneshot::Sender<Vec<InventorySlot>>),
    GetHistory(oneshot::Sender<Vec<TransactionSummary>>),
}

/// Handle to a running vending machine.
///
/// The machine itself is a task owning all mutable state (reducer state,
/// change bank, inventory); the handle sends commands over a channel and
/// awaits the resulting state snapshot. One command is processed at a time,
/// so accept-cash-then-maybe-refund can never interleave with another
/// insertion, and no customer command is handled while a card authorization
/// is in flight.
#[derive(Clone)]
pub struct VendingMachine {
    commands: mpsc::Sender<Command>,
}

impl VendingMachine {
    /// Validates the configuration and spawns the machine task on the current
    /// tokio runtime.
    pub fn spawn(config: MachineConfig, authorizer: CardAuthorizerBox) -> Result<Self> {
        let catalog = Catalog::new(config.drinks.clone())?;
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let core = MachineCore::new(&config, catalog, authorizer);
        tokio::spawn(
            MachineTask {
                core,
                commands: receiver,
                timer: None,
            }
            .run(),
        );
        Ok(Self { commands })
    }

    pub async fn select_drink(&self, drink_id: &str) -> Result<MachineState> {
        self.intent(Intent::SelectDrink(drink_id.to_string())).await
    }

    pub async fn choose_payment_method(&self, method: PaymentMethod) -> Result<MachineState> {
        self.intent(Intent::ChoosePaymentMethod(method)).await
    }

    pub async fn insert_cash(&self, denomination: Denomination) -> Result<MachineState> {
        self.intent(Intent::InsertCash(denomination)).await
    }

    /// Runs a card authorization to completion. The returned state reflects
    /// the approve/decline outcome; an in-flight authorization cannot be
    /// cancelled.
    pub async fn authorize_card(&self, outcome: Option<CardOutcome>) -> Result<MachineState> {
        self.intent(Intent::AuthorizeCard(outcome)).await
    }

    pub async fn cancel_transaction(&self) -> Result<MachineState> {
        self.intent(Intent::Cancel).await
    }

    pub async fn reset(&self) -> Result<MachineState> {
        self.intent(Intent::Reset).await
    }

    pub async fn enter_maintenance(&self) -> Result<MachineState> {
        self.intent(Intent::EnterMaintenance).await
    }

    pub async fn exit_maintenance(&self) -> Result<MachineState> {
        self.intent(Intent::ExitMaintenance).await
    }

    /// Operator/diagnostic entry for the hardware-fault path. Only meaningful
    /// while dispensing; otherwise a no-op.
    pub async fn report_dispense_failure(&self, error_code: Option<String>) -> Result<MachineState> {
        self.intent(Intent::ReportDispenseFailure(error_code)).await
    }

    pub async fn set_card_simulation_mode(&self, mode: CardOutcome) -> Result<MachineState> {
        self.intent(Intent::SetCardSimulationMode(mode)).await
    }

    pub async fn set_stock(&self, drink_id: &str, amount: u32) -> Result<MachineState> {
        self.intent(Intent::SetStock {
            drink_id: drink_id.to_string(),
            amount,
        })
        .await
    }

    pub async fn restock(&self, drink_id: &str, amount: u32) -> Result<MachineState> {
        self.intent(Intent::Restock {
            drink_id: drink_id.to_string(),
            amount,
        })
        .await
    }

    pub async fn state(&self) -> Result<MachineState> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::GetState(reply)).await?;
        receiver.await.map_err(|_| VendingError::MachineUnavailable)
    }

    pub async fn inventory(&self) -> Result<Vec<InventorySlot>> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::GetInventory(reply)).await?;
        receiver.await.map_err(|_| VendingError::MachineUnavailable)
    }

    pub async fn history(&self) -> Result<Vec<TransactionSummary>> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::GetHistory(reply)).await?;
        receiver.await.map_err(|_| VendingError::MachineUnavailable)
    }

    async fn intent(&self, intent: Intent) -> Result<MachineState> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::Intent { intent, reply }).await?;
        receiver
            .await
            .map_err(|_| VendingError::MachineUnavailable)?
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| VendingError::MachineUnavailable)
    }
}

struct Delays {
    dispense: Duration,
    refund: Duration,
    refund_display: Duration,
    auto_reset: Duration,
}

/// The machine's single timer slot: the auto-transition that should fire next
/// if no command intervenes.
struct PendingTimer {
    deadline: Instant,
    event: MachineEvent,
}

struct MachineTask {
    core: MachineCore,
    commands: mpsc::Receiver<Command>,
    timer: Option<PendingTimer>,
}

impl MachineTask {
    async fn run(mut self) {
        loop {
            let deadline = self.timer.as_ref().map(|timer| timer.deadline);
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    match command {
                        Command::Intent { intent, reply } => {
                            let result = self.core.handle(intent).await;
                            let _ = reply.send(result.map(|()| self.core.state.clone()));
                            self.reschedule();
                        }
                        Command::GetState(reply) => {
                            let _ = reply.send(self.core.state.clone());
                        }
                        Command::GetInventory(reply) => {
                            let _ = reply.send(self.core.inventory.list());
                        }
                        Command::GetHistory(reply) => {
                            let _ = reply.send(self.core.state.history.to_vec());
                        }
                    }
                }
                () = sleep_until(deadline) => {
                    if let Some(timer) = self.timer.take() {
                        self.core.apply_timed(timer.event);
                        self.reschedule();
                    }
                }
            }
        }
        debug!("machine task stopped");
    }

    /// Recomputes the timer slot from the current status. Replacing the slot
    /// is what cancels a stale timer: once the state moves away from the
    /// status that scheduled it, the old deadline is dropped. An unchanged
    /// auto-transition keeps its original deadline so ignored commands do not
    /// push it out.
    fn reschedule(&mut self) {
        match self.core.scheduled_transition() {
            Some((delay, event)) => {
                let unchanged = self
                    .timer
                    .as_ref()
                    .is_some_and(|timer| timer.event == event);
                if !unchanged {
                    self.timer = Some(PendingTimer {
                        deadline: Instant::now() + delay,
                        event,
                    });
                }
            }
            None => self.timer = None,
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

struct MachineCore {
    state: MachineState,
    catalog: Catalog,
    inventory: InventoryLedger,
    payments: PaymentProcessor,
    authorizer: CardAuthorizerBox,
    card_simulation_mode: CardOutcome,
    delays: Delays,
}

impl MachineCore {
    fn new(config: &MachineConfig, catalog: Catalog, authorizer: CardAuthorizerBox) -> Self {
        let payments = PaymentProcessor::new(config.bank_seed.clone());
        Self {
            state: MachineState::initial(payments.bank_snapshot(), config.history_capacity),
            catalog,
            inventory: InventoryLedger::new(config.inventory.clone()),
            payments,
            authorizer,
            card_simulation_mode: CardOutcome::Approve,
            delays: Delays {
                dispense: Duration::from_millis(config.dispense_delay_ms),
                refund: Duration::from_millis(config.refund_delay_ms),
                refund_display: Duration::from_millis(config.refund_display_delay_ms),
                auto_reset: Duration::from_millis(config.auto_reset_delay_ms),
            },
        }
    }

    fn apply(&mut self, event: MachineEvent) {
        let next = reduce(&self.state, event, &self.catalog, Utc::now());
        if next.status != self.state.status {
            info!(from = ?self.state.status, to = ?next.status, "state transition");
        }
        self.state = next;
    }

    /// The auto-transition the current status calls for, if any.
    fn scheduled_transition(&self) -> Option<(Duration, MachineEvent)> {
        match self.state.status {
            MachineStatus::Dispensing => Some((self.delays.dispense, MachineEvent::DispenseSuccess)),
            MachineStatus::Refund => match &self.state.pending_change {
                Some(change) => {
                    // Zero-total change is dispensed immediately; anything
                    // else waits for the physical change delay.
                    let delay = if change.total > 0 {
                        self.delays.refund
                    } else {
                        Duration::ZERO
                    };
                    Some((delay, MachineEvent::ChangeDispensed { change: change.clone() }))
                }
                None => {
                    let refund_total = self
                        .state
                        .pending_refund
                        .or_else(|| {
                            self.state
                                .pending_refund_breakdown
                                .as_ref()
                                .map(|breakdown| breakdown.total)
                        })
                        .unwrap_or(0);
                    let delay = if refund_total > 0 {
                        self.delays.refund_display
                    } else {
                        self.delays.refund
                    };
                    Some((delay, MachineEvent::RefundComplete))
                }
            },
            MachineStatus::Complete => Some((self.delays.auto_reset, MachineEvent::Reset)),
            _ => None,
        }
    }

    /// Applies a timed auto-transition, dropping it if the state has already
    /// moved on. A stale timer must never crash or corrupt a newer
    /// transaction.
    fn apply_timed(&mut self, event: MachineEvent) {
        let applicable = match &event {
            MachineEvent::DispenseSuccess => self.state.status == MachineStatus::Dispensing,
            MachineEvent::ChangeDispensed { .. } => {
                self.state.status == MachineStatus::Refund && self.state.pending_change.is_some()
            }
            MachineEvent::RefundComplete => self.state.status == MachineStatus::Refund,
            MachineEvent::Reset => self.state.status == MachineStatus::Complete,
            _ => true,
        };
        if !applicable {
            warn!(status = ?self.state.status, "stale timed event ignored");
            return;
        }
        self.apply(event);
    }

    async fn handle(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::SelectDrink(drink_id) => self.select_drink(&drink_id),
            Intent::ChoosePaymentMethod(method) => {
                self.choose_payment_method(method);
                Ok(())
            }
            Intent::InsertCash(denomination) => {
                self.insert_cash(denomination);
                Ok(())
            }
            Intent::AuthorizeCard(outcome) => {
                self.authorize_card(outcome).await;
                Ok(())
            }
            Intent::Cancel => {
                self.cancel();
                Ok(())
            }
            Intent::Reset => {
                self.apply(MachineEvent::Reset);
                Ok(())
            }
            Intent::EnterMaintenance => {
                self.apply(MachineEvent::EnterMaintenance);
                Ok(())
            }
            Intent::ExitMaintenance => {
                if self.state.status == MachineStatus::Maintenance {
                    self.apply(MachineEvent::ExitMaintenance);
                }
                Ok(())
            }
            Intent::ReportDispenseFailure(error_code) => {
                if self.state.status == MachineStatus::Dispensing {
                    self.apply(MachineEvent::DispenseFailure { error_code });
                } else {
                    warn!(status = ?self.state.status, "dispense failure reported outside dispensing");
                }
                Ok(())
            }
            Intent::SetCardSimulationMode(mode) => {
                self.card_simulation_mode = mode;
                Ok(())
            }
            Intent::SetStock { drink_id, amount } => self.inventory.set_stock(&drink_id, amount),
            Intent::Restock { drink_id, amount } => self.inventory.restock(&drink_id, amount),
        }
    }

    fn select_drink(&mut self, drink_id: &str) -> Result<()> {
        if matches!(
            self.state.status,
            MachineStatus::ProcessingPayment
                | MachineStatus::Dispensing
                | MachineStatus::Refund
                | MachineStatus::Maintenance
        ) {
            return Ok(());
        }
        if self.catalog.get(drink_id).is_none() {
            return Err(VendingError::UnknownDrink(drink_id.to_string()));
        }
        if !self.inventory.is_in_stock(drink_id) {
            self.apply(MachineEvent::SetMessage {
                message: "Selected drink is out of stock.".to_string(),
            });
            return Ok(());
        }
        self.apply(MachineEvent::SelectDrink {
            drink_id: drink_id.to_string(),
        });
        Ok(())
    }

    fn choose_payment_method(&mut self, method: PaymentMethod) {
        if self.state.selected_drink.is_none() {
            self.apply(MachineEvent::SetMessage {
                message: "Please select a drink first.".to_string(),
            });
            return;
        }
        // Inserted cash must be retrieved through cancel before switching to
        // card, so the "card implies zero balance" invariant holds.
        if method == PaymentMethod::Card && self.state.balance > 0 {
            self.apply(MachineEvent::SetMessage {
                message: "Cancel to retrieve inserted cash before switching to card.".to_string(),
            });
            return;
        }
        if self.state.payment_method == Some(method) {
            return;
        }
        if self.state.status != MachineStatus::AwaitingPayment {
            return;
        }
        self.apply(MachineEvent::SetPaymentMethod { method });
    }

    fn insert_cash(&mut self, denomination: Denomination) {
        if self.state.selected_drink.is_none()
            || self.state.payment_method != Some(PaymentMethod::Cash)
        {
            self.apply(MachineEvent::SetMessage {
                message: "Select a drink before inserting cash.".to_string(),
            });
            return;
        }
        if self.state.status != MachineStatus::AwaitingPayment {
            return;
        }

        let acceptance =
            self.payments
                .accept_cash(denomination, self.state.balance, &self.state.inserted_cash);
        self.apply(MachineEvent::CashInserted {
            balance: acceptance.balance,
            inserted_cash: acceptance.inserted_cash.clone(),
            bank: self.payments.bank_snapshot(),
        });

        let Some(drink) = self
            .state
            .selected_drink
            .as_deref()
            .and_then(|id| self.catalog.get(id))
            .cloned()
        else {
            return;
        };

        if acceptance.balance < drink.price {
            return;
        }

        let change = self.payments.make_change_for(drink.price, acceptance.balance);
        if change.shortage > 0 {
            // Partial change is never dispensed: the whole tally goes back
            // and the sale does not happen.
            warn!(
                shortage = change.shortage,
                "change bank cannot cover change, refunding inserted cash"
            );
            let refund = self.payments.refund_inserted_cash(&acceptance.inserted_cash);
            self.apply(MachineEvent::RefundInitiated {
                amount: refund.total,
                breakdown: Some(refund),
                bank: Some(self.payments.bank_snapshot()),
                message: Some("Unable to provide change. Refunding payment.".to_string()),
            });
            return;
        }

        self.apply(MachineEvent::PaymentApproved {
            change: Some(change),
            bank: Some(self.payments.bank_snapshot()),
        });
        self.inventory.decrement(&drink.id);
    }

    async fn authorize_card(&mut self, outcome: Option<CardOutcome>) {
        if self.state.selected_drink.is_none()
            || self.state.payment_method != Some(PaymentMethod::Card)
        {
            self.apply(MachineEvent::SetMessage {
                message: "Select a drink before tapping card.".to_string(),
            });
            return;
        }
        if self.state.status != MachineStatus::AwaitingPayment {
            return;
        }
        self.apply(MachineEvent::TapCard);

        let Some(drink) = self
            .state
            .selected_drink
            .as_deref()
            .and_then(|id| self.catalog.get(id))
            .cloned()
        else {
            return;
        };

        let options = AuthorizationOptions {
            simulate_outcome: Some(outcome.unwrap_or(self.card_simulation_mode)),
            error_code: None,
        };
        match self.authorizer.authorize(drink.price, options).await {
            Ok(AuthorizationOutcome::Approved { .. }) => {
                self.apply(MachineEvent::PaymentApproved {
                    change: None,
                    bank: Some(self.payments.bank_snapshot()),
                });
                self.inventory.decrement(&drink.id);
            }
            Ok(AuthorizationOutcome::Declined { error_code, message }) => {
                warn!(error_code = %error_code, "card authorization declined");
                self.apply(MachineEvent::PaymentDeclined {
                    error_code: Some(error_code),
                    message: Some(message),
                });
            }
            Err(error) => {
                warn!(%error, "card reader fault");
                self.apply(MachineEvent::PaymentDeclined {
                    error_code: Some("CARD_ERROR".to_string()),
                    message: Some(error.to_string()),
                });
            }
        }
    }

    fn cancel(&mut self) {
        if !matches!(
            self.state.status,
            MachineStatus::AwaitingPayment | MachineStatus::ProcessingPayment
        ) {
            return;
        }

        let mut amount = self.state.balance;
        let mut refund = None;
        if self.state.payment_method == Some(PaymentMethod::Cash) && amount > 0 {
            let breakdown = self.payments.refund_inserted_cash(&self.state.inserted_cash);
            amount = breakdown.total;
            refund = Some(breakdown);
        }
        if self.state.payment_method == Some(PaymentMethod::Card) {
            amount = 0;
        }

        let message = if amount > 0 {
            format!("Cancelling… returning {}", format_won(amount))
        } else {
            "Cancelling transaction…".to_string()
        };
        self.apply(MachineEvent::Cancel {
            amount,
            refund,
            bank: self.payments.bank_snapshot(),
            message: Some(message),
        });
    }
}
