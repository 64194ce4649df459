use chrono::{DateTime, FixedOffset};
use clap::{Parser, ValueEnum};
use miette::{Result, miette};
use nalogo_receipts::application::receipts::{NewIncome, ReceiptService};
use nalogo_receipts::config::CredentialsArgs;
use nalogo_receipts::domain::income::{IncomeClient, IncomeType};
use nalogo_receipts::domain::ports::IncomeApiBox;
use nalogo_receipts::infrastructure::in_memory::InMemoryIncomeApi;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum ClientType {
    Individual,
    LegalEntity,
    ForeignAgency,
}

impl From<ClientType> for IncomeType {
    fn from(value: ClientType) -> Self {
        match value {
            ClientType::Individual => IncomeType::FromIndividual,
            ClientType::LegalEntity => IncomeType::FromLegalEntity,
            ClientType::ForeignAgency => IncomeType::FromForeignAgency,
        }
    }
}

/// Registers income and prints the issued receipt UUID.
///
/// Receipts are submitted to the in-memory sandbox API.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    credentials: CredentialsArgs,

    /// Name of the service provided
    #[arg(long)]
    item: String,

    /// Price of one unit
    #[arg(long)]
    amount: f64,

    /// Number of units
    #[arg(long, default_value_t = 1.0)]
    quantity: f64,

    /// When the income was received (RFC 3339). Defaults to now.
    #[arg(long)]
    operation_time: Option<DateTime<FixedOffset>>,

    /// Buyer display name
    #[arg(long)]
    client_name: Option<String>,

    /// Buyer INN
    #[arg(long)]
    client_inn: Option<String>,

    /// Buyer contact phone
    #[arg(long)]
    client_phone: Option<String>,

    /// Kind of buyer
    #[arg(long, value_enum)]
    client_type: Option<ClientType>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| miette!("failed to initialize logging: {e}"))?;

    let cli = Cli::parse();

    let api: IncomeApiBox = Box::new(InMemoryIncomeApi::new());
    let service = ReceiptService::with_credentials(api, cli.credentials.credentials());

    let mut income = NewIncome::new(cli.item, cli.amount).quantity(cli.quantity);
    if let Some(operation_time) = cli.operation_time {
        income = income.operation_time(operation_time);
    }

    let client = IncomeClient {
        contact_phone: cli.client_phone,
        display_name: cli.client_name,
        income_type: cli.client_type.map(IncomeType::from),
        inn: cli.client_inn,
    };
    if client != IncomeClient::default() {
        income = income.client(client);
    }

    let receipt = service.create_income_receipt(income).await;
    service.close().await;

    match receipt {
        Some(receipt_uuid) => {
            println!("{receipt_uuid}");
            Ok(())
        }
        None => Err(miette!("receipt not created")),
    }
}
