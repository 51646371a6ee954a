use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vendo::{
    CardOutcome, Denomination, MachineConfig, MachineState, MachineStatus, PaymentMethod,
    SimulatedCardReader, VendingMachine,
};

#[derive(Parser)]
#[command(author, version, about = "Scripted demo of the vending machine control core", long_about = None)]
struct Cli {
    /// Optional JSON machine configuration (delays, bank seed, catalog)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated outcome for the card purchase in the demo
    #[arg(long, value_enum, default_value_t = CardMode::Approve)]
    card_mode: CardMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CardMode {
    Approve,
    Decline,
}

impl From<CardMode> for CardOutcome {
    fn from(mode: CardMode) -> Self {
        match mode {
            CardMode::Approve => CardOutcome::Approve,
            CardMode::Decline => CardOutcome::Decline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).into_diagnostic()?;
            serde_json::from_str(&raw).into_diagnostic()?
        }
        None => MachineConfig::default(),
    };

    let card_delay = Duration::from_millis(config.card_delay_ms);
    let machine = VendingMachine::spawn(config, Box::new(SimulatedCardReader::new(card_delay)))
        .into_diagnostic()?;

    // Cash purchase: cola with a 1,000 + 500 insertion, change returned.
    let state = machine.select_drink("cola").await.into_diagnostic()?;
    println!("{}", state.message);
    let state = machine
        .choose_payment_method(PaymentMethod::Cash)
        .await
        .into_diagnostic()?;
    println!("{}", state.message);
    let state = machine
        .insert_cash(Denomination::Won1000)
        .await
        .into_diagnostic()?;
    println!("{}", state.message);
    let state = machine
        .insert_cash(Denomination::Won500)
        .await
        .into_diagnostic()?;
    println!("{}", state.message);
    let state = wait_for_status(&machine, MachineStatus::Complete).await?;
    println!("{}", state.message);
    machine.reset().await.into_diagnostic()?;

    // Card purchase: coffee, outcome per --card-mode.
    let state = machine.select_drink("coffee").await.into_diagnostic()?;
    println!("{}", state.message);
    let state = machine
        .choose_payment_method(PaymentMethod::Card)
        .await
        .into_diagnostic()?;
    println!("{}", state.message);
    let state = machine
        .authorize_card(Some(cli.card_mode.into()))
        .await
        .into_diagnostic()?;
    println!("{}", state.message);
    if state.status == MachineStatus::Dispensing {
        let state = wait_for_status(&machine, MachineStatus::Complete).await?;
        println!("{}", state.message);
    } else {
        machine.cancel_transaction().await.into_diagnostic()?;
    }

    let history = machine.history().await.into_diagnostic()?;
    println!("{}", serde_json::to_string_pretty(&history).into_diagnostic()?);

    Ok(())
}

async fn wait_for_status(machine: &VendingMachine, status: MachineStatus) -> Result<MachineState> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    loop {
        let state = machine.state().await.into_diagnostic()?;
        if state.status == status {
            return Ok(state);
        }
        if tokio::time::Instant::now() >= deadline {
            miette::bail!("timed out waiting for {:?}", status);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
