use crate::domain::catalog::Catalog;
use crate::domain::history::{TransactionLog, TransactionSummary};
use crate::domain::money::{format_won, ChangeBank, ChangeBreakdown, DenominationCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const INITIAL_MESSAGE: &str = "Select a drink to begin.";

/// Lifecycle status of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MachineStatus {
    Idle,
    AwaitingPayment,
    ProcessingPayment,
    Dispensing,
    Refund,
    Complete,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Kind of entry in the append-only event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    SelectItem,
    ChoosePaymentMethod,
    InsertCash,
    TapCard,
    PaymentApproved,
    PaymentDeclined,
    Cancel,
    DispenseSuccess,
    DispenseFailure,
    Refund,
    MaintenanceEnter,
    MaintenanceExit,
    Reset,
}

/// One entry of the machine's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub kind: EventKind,
    pub at: DateTime<Utc>,
    pub payload: Option<serde_json::Value>,
}

/// Events accepted by the reducer. Raised by the orchestrator (customer
/// intents it has validated and enriched with bank/inventory data) and by the
/// timer driving the auto-transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    SelectDrink {
        drink_id: String,
    },
    SetPaymentMethod {
        method: PaymentMethod,
    },
    CashInserted {
        balance: u32,
        inserted_cash: DenominationCounts,
        bank: ChangeBank,
    },
    TapCard,
    PaymentApproved {
        change: Option<ChangeBreakdown>,
        bank: Option<ChangeBank>,
    },
    PaymentDeclined {
        error_code: Option<String>,
        message: Option<String>,
    },
    DispenseSuccess,
    ChangeDispensed {
        change: ChangeBreakdown,
    },
    RefundInitiated {
        amount: u32,
        breakdown: Option<ChangeBreakdown>,
        bank: Option<ChangeBank>,
        message: Option<String>,
    },
    Cancel {
        amount: u32,
        refund: Option<ChangeBreakdown>,
        bank: ChangeBank,
        message: Option<String>,
    },
    RefundComplete,
    DispenseFailure {
        error_code: Option<String>,
    },
    Reset,
    EnterMaintenance,
    ExitMaintenance,
    SetMessage {
        message: String,
    },
}

/// Full snapshot of the controller. Replaced wholesale by [`reduce`] on every
/// accepted event; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineState {
    pub status: MachineStatus,
    pub selected_drink: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub balance: u32,
    pub inserted_cash: DenominationCounts,
    /// Display snapshot; the authoritative bank lives in the payment
    /// processor.
    pub change_bank: ChangeBank,
    pub message: String,
    pub error_code: Option<String>,
    pub pending_authorization: bool,
    pub pending_change: Option<ChangeBreakdown>,
    pub pending_refund: Option<u32>,
    pub pending_refund_breakdown: Option<ChangeBreakdown>,
    pub last_transaction: Option<TransactionSummary>,
    pub history: TransactionLog,
    pub events: Vec<TransactionEvent>,
}

impl MachineState {
    pub fn initial(change_bank: ChangeBank, history_capacity: usize) -> Self {
        Self {
            status: MachineStatus::Idle,
            selected_drink: None,
            payment_method: None,
            balance: 0,
            inserted_cash: DenominationCounts::new(),
            change_bank,
            message: INITIAL_MESSAGE.to_string(),
            error_code: None,
            pending_authorization: false,
            pending_change: None,
            pending_refund: None,
            pending_refund_breakdown: None,
            last_transaction: None,
            history: TransactionLog::new(history_capacity),
            events: Vec::new(),
        }
    }

    /// Fresh transaction fields with the bank snapshot, history and event log
    /// carried over. Used by reset, refund completion and maintenance exit.
    fn reinitialized(&self) -> Self {
        Self {
            history: self.history.clone(),
            events: self.events.clone(),
            ..Self::initial(self.change_bank.clone(), self.history.capacity())
        }
    }

    fn record(&self, kind: EventKind, payload: Option<serde_json::Value>, now: DateTime<Utc>) -> Vec<TransactionEvent> {
        let mut events = self.events.clone();
        events.push(TransactionEvent { kind, at: now, payload });
        events
    }
}

fn append_history(history: &TransactionLog, summary: Option<&TransactionSummary>) -> TransactionLog {
    let mut next = history.clone();
    if let Some(summary) = summary {
        next.push(summary.clone());
    }
    next
}

/// Pure transition function: `(state, event) -> state`.
///
/// No IO and no hidden clock besides the injected `now`, which only stamps
/// log entries and transaction summaries; the derived status message depends
/// on state alone.
pub fn reduce(
    state: &MachineState,
    event: MachineEvent,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> MachineState {
    let selected_drink = state
        .selected_drink
        .as_deref()
        .and_then(|id| catalog.get(id));

    match event {
        MachineEvent::Reset => MachineState {
            events: state.record(EventKind::Reset, None, now),
            ..state.reinitialized()
        },
        MachineEvent::SelectDrink { drink_id } => {
            let price_label = catalog
                .get(&drink_id)
                .map(|drink| format_won(drink.price))
                .unwrap_or_else(|| "the price".to_string());
            MachineState {
                status: MachineStatus::AwaitingPayment,
                selected_drink: Some(drink_id.clone()),
                payment_method: None,
                balance: 0,
                inserted_cash: DenominationCounts::new(),
                pending_change: None,
                pending_refund: None,
                error_code: None,
                message: format!("Select cash or card to pay {price_label}."),
                events: state.record(EventKind::SelectItem, Some(json!({ "drinkId": drink_id })), now),
                ..state.clone()
            }
        }
        MachineEvent::SetPaymentMethod { method } => MachineState {
            payment_method: Some(method),
            balance: if method == PaymentMethod::Card { 0 } else { state.balance },
            inserted_cash: if method == PaymentMethod::Card {
                DenominationCounts::new()
            } else {
                state.inserted_cash.clone()
            },
            pending_change: if method == PaymentMethod::Card {
                None
            } else {
                state.pending_change.clone()
            },
            pending_refund: if method == PaymentMethod::Card {
                None
            } else {
                state.pending_refund
            },
            message: match method {
                PaymentMethod::Cash => match selected_drink {
                    Some(drink) => format!(
                        "Insert {} in total to purchase {}.",
                        format_won(drink.price),
                        drink.name
                    ),
                    None => "Insert cash to continue.".to_string(),
                },
                PaymentMethod::Card => {
                    "Tap authorize when you're ready, then hold your card near the reader."
                        .to_string()
                }
            },
            events: state.record(
                EventKind::ChoosePaymentMethod,
                Some(json!({ "method": method })),
                now,
            ),
            ..state.clone()
        },
        MachineEvent::CashInserted {
            balance,
            inserted_cash,
            bank,
        } => MachineState {
            payment_method: Some(PaymentMethod::Cash),
            balance,
            inserted_cash,
            change_bank: bank,
            message: match selected_drink {
                Some(drink) if balance >= drink.price => {
                    "Sufficient balance detected. Processing payment…".to_string()
                }
                Some(drink) => format!(
                    "Balance {} — need {} more.",
                    format_won(balance),
                    format_won(drink.price - balance)
                ),
                None => state.message.clone(),
            },
            events: state.record(EventKind::InsertCash, Some(json!({ "balance": balance })), now),
            ..state.clone()
        },
        MachineEvent::TapCard => MachineState {
            status: MachineStatus::ProcessingPayment,
            pending_authorization: true,
            message: "Authorizing card…".to_string(),
            events: state.record(EventKind::TapCard, None, now),
            ..state.clone()
        },
        MachineEvent::PaymentApproved { change, bank } => {
            let summary = match (selected_drink, state.payment_method) {
                (Some(drink), Some(method)) => Some(TransactionSummary {
                    drink_id: drink.id.clone(),
                    drink_name: drink.name.clone(),
                    payment_method: method,
                    amount_charged: drink.price,
                    change: change.clone(),
                    completed_at: now,
                }),
                _ => state.last_transaction.clone(),
            };
            MachineState {
                status: MachineStatus::Dispensing,
                pending_authorization: false,
                pending_change: change,
                change_bank: bank.unwrap_or_else(|| state.change_bank.clone()),
                balance: match state.payment_method {
                    Some(PaymentMethod::Cash) => selected_drink.map(|d| d.price).unwrap_or(0),
                    _ => 0,
                },
                inserted_cash: DenominationCounts::new(),
                last_transaction: summary,
                message: match selected_drink {
                    Some(drink) => format!("Dispensing {}…", drink.name),
                    None => "Dispensing selection…".to_string(),
                },
                events: state.record(EventKind::PaymentApproved, None, now),
                ..state.clone()
            }
        }
        MachineEvent::PaymentDeclined { error_code, message } => MachineState {
            status: MachineStatus::AwaitingPayment,
            payment_method: None,
            pending_authorization: false,
            error_code: error_code.clone(),
            message: message
                .clone()
                .unwrap_or_else(|| "Card declined. Try again or choose cash.".to_string()),
            events: state.record(
                EventKind::PaymentDeclined,
                Some(json!({ "errorCode": error_code, "message": message })),
                now,
            ),
            ..state.clone()
        },
        MachineEvent::DispenseSuccess => {
            let has_change = state
                .pending_change
                .as_ref()
                .is_some_and(|change| change.total > 0);
            let transaction = state.last_transaction.as_ref();
            let drink_label = transaction
                .map(|t| t.drink_name.clone())
                .or_else(|| selected_drink.map(|d| d.name.clone()))
                .unwrap_or_else(|| "drink".to_string());
            MachineState {
                status: if has_change {
                    MachineStatus::Refund
                } else {
                    MachineStatus::Complete
                },
                balance: if has_change { state.balance } else { 0 },
                inserted_cash: if has_change {
                    state.inserted_cash.clone()
                } else {
                    DenominationCounts::new()
                },
                pending_refund_breakdown: if has_change {
                    state.pending_refund_breakdown.clone()
                } else {
                    None
                },
                history: if has_change {
                    state.history.clone()
                } else {
                    append_history(&state.history, transaction)
                },
                message: if has_change {
                    format!(
                        "Dispense complete. Returning {} in change.",
                        format_won(state.pending_change.as_ref().map(|c| c.total).unwrap_or(0))
                    )
                } else {
                    match transaction {
                        Some(t) => {
                            let payment_label = match t.payment_method {
                                PaymentMethod::Card => "card",
                                PaymentMethod::Cash => "cash",
                            };
                            format!(
                                "Dispense complete. {} {} confirmed. Enjoy your {}!",
                                format_won(t.amount_charged),
                                payment_label,
                                drink_label
                            )
                        }
                        None => format!("Dispense complete. Enjoy your {drink_label}!"),
                    }
                },
                events: state.record(EventKind::DispenseSuccess, None, now),
                ..state.clone()
            }
        }
        MachineEvent::ChangeDispensed { change } => {
            let summary = state.last_transaction.clone().map(|t| TransactionSummary {
                change: Some(change.clone()),
                ..t
            });
            let change_message = if change.total > 0 {
                format!("Change returned. {} dispensed.", format_won(change.total))
            } else {
                "Change returned.".to_string()
            };
            let drink_label = summary
                .as_ref()
                .map(|s| s.drink_name.clone())
                .or_else(|| selected_drink.map(|d| d.name.clone()))
                .unwrap_or_else(|| "drink".to_string());
            MachineState {
                status: MachineStatus::Complete,
                balance: 0,
                inserted_cash: DenominationCounts::new(),
                pending_change: None,
                pending_refund: None,
                pending_refund_breakdown: None,
                history: append_history(&state.history, summary.as_ref()),
                last_transaction: summary,
                message: format!("{change_message} Enjoy your {drink_label}!"),
                events: state.record(EventKind::Refund, None, now),
                ..state.clone()
            }
        }
        MachineEvent::RefundInitiated {
            amount,
            breakdown,
            bank,
            message,
        } => MachineState {
            status: MachineStatus::Refund,
            pending_refund: Some(amount),
            pending_refund_breakdown: breakdown.or_else(|| state.pending_refund_breakdown.clone()),
            change_bank: bank.unwrap_or_else(|| state.change_bank.clone()),
            balance: 0,
            inserted_cash: DenominationCounts::new(),
            message: message.unwrap_or_else(|| {
                format!("Returning {} to you. Please wait…", format_won(amount))
            }),
            events: state.record(EventKind::Refund, Some(json!({ "amount": amount })), now),
            ..state.clone()
        },
        MachineEvent::RefundComplete => MachineState {
            events: state.record(EventKind::Refund, None, now),
            ..state.reinitialized()
        },
        MachineEvent::DispenseFailure { error_code } => {
            let error_code = error_code.unwrap_or_else(|| "DISPENSE_ERROR".to_string());
            MachineState {
                status: MachineStatus::Maintenance,
                error_code: Some(error_code.clone()),
                message: "Dispense error. Please contact support.".to_string(),
                events: state.record(
                    EventKind::DispenseFailure,
                    Some(json!({ "errorCode": error_code })),
                    now,
                ),
                ..state.clone()
            }
        }
        MachineEvent::Cancel {
            amount,
            refund,
            bank,
            message,
        } => MachineState {
            status: MachineStatus::Refund,
            pending_refund: Some(amount),
            pending_refund_breakdown: refund.or_else(|| state.pending_refund_breakdown.clone()),
            change_bank: bank,
            balance: 0,
            inserted_cash: DenominationCounts::new(),
            message: message.unwrap_or_else(|| {
                if amount > 0 {
                    format!("Cancelling… returning {}", format_won(amount))
                } else {
                    "Order cancelled. No payment taken.".to_string()
                }
            }),
            events: state.record(EventKind::Cancel, None, now),
            ..state.clone()
        },
        MachineEvent::EnterMaintenance => MachineState {
            status: MachineStatus::Maintenance,
            message: "Maintenance mode. Customer access disabled.".to_string(),
            events: state.record(EventKind::MaintenanceEnter, None, now),
            ..state.clone()
        },
        MachineEvent::ExitMaintenance => MachineState {
            events: state.record(EventKind::MaintenanceExit, None, now),
            ..state.reinitialized()
        },
        MachineEvent::SetMessage { message } => MachineState {
            message,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{default_drinks, Catalog};
    use crate::domain::money::{make_change, Denomination};

    fn catalog() -> Catalog {
        Catalog::new(default_drinks()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn initial() -> MachineState {
        MachineState::initial(ChangeBank::default_seed(), TransactionLog::DEFAULT_CAPACITY)
    }

    fn select(state: &MachineState, id: &str) -> MachineState {
        reduce(
            state,
            MachineEvent::SelectDrink { drink_id: id.to_string() },
            &catalog(),
            now(),
        )
    }

    #[test]
    fn test_select_drink_enters_awaiting_payment() {
        let state = select(&initial(), "cola");
        assert_eq!(state.status, MachineStatus::AwaitingPayment);
        assert_eq!(state.selected_drink.as_deref(), Some("cola"));
        assert_eq!(state.balance, 0);
        assert_eq!(state.message, "Select cash or card to pay ₩1,100.");
    }

    #[test]
    fn test_select_drink_clears_previous_transaction_fields() {
        let mut state = select(&initial(), "cola");
        state.balance = 500;
        state.error_code = Some("DECLINED".to_string());
        let state = select(&state, "water");
        assert_eq!(state.balance, 0);
        assert!(state.inserted_cash.is_empty());
        assert!(state.error_code.is_none());
    }

    #[test]
    fn test_set_payment_method_card_clears_cash_fields() {
        let mut state = select(&initial(), "water");
        state.balance = 500;
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Card },
            &catalog(),
            now(),
        );
        assert_eq!(state.payment_method, Some(PaymentMethod::Card));
        assert_eq!(state.balance, 0);
    }

    #[test]
    fn test_cash_insertion_messages() {
        let state = select(&initial(), "cola");
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Cash },
            &catalog(),
            now(),
        );
        let partial = reduce(
            &state,
            MachineEvent::CashInserted {
                balance: 1000,
                inserted_cash: DenominationCounts::from([(Denomination::Won1000, 1)]),
                bank: ChangeBank::default_seed(),
            },
            &catalog(),
            now(),
        );
        assert_eq!(partial.message, "Balance ₩1,000 — need ₩100 more.");

        let covered = reduce(
            &partial,
            MachineEvent::CashInserted {
                balance: 1500,
                inserted_cash: DenominationCounts::from([
                    (Denomination::Won1000, 1),
                    (Denomination::Won500, 1),
                ]),
                bank: ChangeBank::default_seed(),
            },
            &catalog(),
            now(),
        );
        assert_eq!(covered.message, "Sufficient balance detected. Processing payment…");
    }

    #[test]
    fn test_payment_approved_records_summary() {
        let state = select(&initial(), "cola");
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Cash },
            &catalog(),
            now(),
        );
        let change = make_change(400, &ChangeBank::default_seed());
        let state = reduce(
            &state,
            MachineEvent::PaymentApproved {
                change: Some(change.clone()),
                bank: None,
            },
            &catalog(),
            now(),
        );
        assert_eq!(state.status, MachineStatus::Dispensing);
        let summary = state.last_transaction.as_ref().unwrap();
        assert_eq!(summary.amount_charged, 1100);
        assert_eq!(summary.payment_method, PaymentMethod::Cash);
        assert_eq!(summary.change.as_ref(), Some(&change));
        // Cash path retains the price; the remainder is the pending change.
        assert_eq!(state.balance, 1100);
        assert_eq!(state.pending_change, Some(change));
    }

    #[test]
    fn test_payment_declined_returns_to_awaiting_payment() {
        let state = select(&initial(), "water");
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Card },
            &catalog(),
            now(),
        );
        let state = reduce(&state, MachineEvent::TapCard, &catalog(), now());
        assert_eq!(state.status, MachineStatus::ProcessingPayment);
        assert!(state.pending_authorization);

        let state = reduce(
            &state,
            MachineEvent::PaymentDeclined {
                error_code: Some("DECLINED".to_string()),
                message: None,
            },
            &catalog(),
            now(),
        );
        assert_eq!(state.status, MachineStatus::AwaitingPayment);
        assert_eq!(state.payment_method, None);
        assert!(!state.pending_authorization);
        assert_eq!(state.error_code.as_deref(), Some("DECLINED"));
    }

    #[test]
    fn test_dispense_success_with_pending_change_goes_to_refund() {
        let state = select(&initial(), "cola");
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Cash },
            &catalog(),
            now(),
        );
        let change = make_change(400, &ChangeBank::default_seed());
        let state = reduce(
            &state,
            MachineEvent::PaymentApproved { change: Some(change), bank: None },
            &catalog(),
            now(),
        );
        let state = reduce(&state, MachineEvent::DispenseSuccess, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Refund);
        // History is recorded at change dispensing, not yet.
        assert!(state.history.is_empty());

        let change = state.pending_change.clone().unwrap();
        let state = reduce(&state, MachineEvent::ChangeDispensed { change }, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Complete);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.balance, 0);
        assert!(state.pending_change.is_none());
    }

    #[test]
    fn test_dispense_success_without_change_completes_and_records() {
        let state = select(&initial(), "coffee");
        let state = reduce(
            &state,
            MachineEvent::SetPaymentMethod { method: PaymentMethod::Card },
            &catalog(),
            now(),
        );
        let state = reduce(&state, MachineEvent::TapCard, &catalog(), now());
        let state = reduce(
            &state,
            MachineEvent::PaymentApproved { change: None, bank: None },
            &catalog(),
            now(),
        );
        let state = reduce(&state, MachineEvent::DispenseSuccess, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Complete);
        assert_eq!(state.history.len(), 1);
        assert_eq!(
            state.message,
            "Dispense complete. ₩700 card confirmed. Enjoy your Coffee!"
        );
    }

    #[test]
    fn test_cancel_with_refund() {
        let state = select(&initial(), "cola");
        let refund = make_change(1000, &ChangeBank::default_seed());
        let state = reduce(
            &state,
            MachineEvent::Cancel {
                amount: 1000,
                refund: Some(refund.clone()),
                bank: ChangeBank::default_seed(),
                message: None,
            },
            &catalog(),
            now(),
        );
        assert_eq!(state.status, MachineStatus::Refund);
        assert_eq!(state.pending_refund, Some(1000));
        assert_eq!(state.pending_refund_breakdown, Some(refund));
        assert_eq!(state.balance, 0);
    }

    #[test]
    fn test_refund_complete_resets_but_keeps_history() {
        let mut state = select(&initial(), "cola");
        state.history.push(TransactionSummary {
            drink_id: "cola".to_string(),
            drink_name: "Cola".to_string(),
            payment_method: PaymentMethod::Cash,
            amount_charged: 1100,
            change: None,
            completed_at: now(),
        });
        let state = reduce(&state, MachineEvent::RefundComplete, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Idle);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.message, INITIAL_MESSAGE);
    }

    #[test]
    fn test_dispense_failure_enters_maintenance() {
        let state = select(&initial(), "cola");
        let state = reduce(
            &state,
            MachineEvent::DispenseFailure { error_code: None },
            &catalog(),
            now(),
        );
        assert_eq!(state.status, MachineStatus::Maintenance);
        assert_eq!(state.error_code.as_deref(), Some("DISPENSE_ERROR"));
        // The resolved code is logged alongside the event.
        let entry = state.events.last().unwrap();
        assert_eq!(entry.kind, EventKind::DispenseFailure);
        assert_eq!(entry.payload, Some(json!({ "errorCode": "DISPENSE_ERROR" })));
    }

    #[test]
    fn test_dispense_failure_logs_the_given_error_code() {
        let state = select(&initial(), "cola");
        let state = reduce(
            &state,
            MachineEvent::DispenseFailure {
                error_code: Some("MOTOR_JAM".to_string()),
            },
            &catalog(),
            now(),
        );
        assert_eq!(state.error_code.as_deref(), Some("MOTOR_JAM"));
        assert_eq!(
            state.events.last().unwrap().payload,
            Some(json!({ "errorCode": "MOTOR_JAM" }))
        );
    }

    #[test]
    fn test_maintenance_enter_and_exit() {
        let state = reduce(&initial(), MachineEvent::EnterMaintenance, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Maintenance);
        let state = reduce(&state, MachineEvent::ExitMaintenance, &catalog(), now());
        assert_eq!(state.status, MachineStatus::Idle);
        assert_eq!(state.message, INITIAL_MESSAGE);
    }

    #[test]
    fn test_reset_is_idempotent_modulo_event_log() {
        let state = initial();
        let once = reduce(&state, MachineEvent::Reset, &catalog(), now());
        let twice = reduce(&once, MachineEvent::Reset, &catalog(), now());
        let mut twice_without_log = twice.clone();
        twice_without_log.events = once.events.clone();
        assert_eq!(once, twice_without_log);
        assert_eq!(twice.events.len(), once.events.len() + 1);
    }

    #[test]
    fn test_event_log_is_append_only() {
        let state = initial();
        let state = select(&state, "cola");
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.events[0].kind, EventKind::SelectItem);
        let state = reduce(&state, MachineEvent::Reset, &catalog(), now());
        assert_eq!(state.events.len(), 2);
        assert_eq!(state.events[1].kind, EventKind::Reset);
    }
}
