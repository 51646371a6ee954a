pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::machine::{MachineConfig, VendingMachine};
pub use application::payment::PaymentProcessor;
pub use domain::catalog::{Catalog, Drink};
pub use domain::history::{TransactionLog, TransactionSummary};
pub use domain::inventory::{InventoryLedger, InventorySlot};
pub use domain::money::{
    apply_change, make_change, ChangeBank, ChangeBreakdown, Denomination, DenominationCounts,
};
pub use domain::ports::{
    AuthorizationOptions, AuthorizationOutcome, CardAuthorizer, CardAuthorizerBox, CardOutcome,
};
pub use domain::state::{MachineState, MachineStatus, PaymentMethod};
pub use error::{Result, VendingError};
pub use infrastructure::card::SimulatedCardReader;
