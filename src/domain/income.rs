use crate::error::{ReceiptError, Result};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// How the income was received.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Account,
}

/// Who paid for the service.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeType {
    FromIndividual,
    FromLegalEntity,
    FromForeignAgency,
}

/// Buyer details attached to a receipt.
///
/// Every field is optional; the default value is an anonymous client and
/// serializes as an empty object.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct IncomeClient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_type: Option<IncomeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
}

/// Timestamp encoded as RFC 3339 with second precision and a numeric offset,
/// e.g. `2024-05-01T12:30:00+03:00`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AtomDateTime(DateTime<FixedOffset>);

impl AtomDateTime {
    pub fn now() -> Self {
        Self(Local::now().fixed_offset())
    }

    pub fn from_datetime<Tz: TimeZone>(value: DateTime<Tz>) -> Self {
        Self(value.fixed_offset())
    }

    pub fn value(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl Serialize for AtomDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, false))
    }
}

/// A single billable line of a receipt.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ServiceItem {
    pub name: String,
    pub amount: Decimal,
    pub quantity: Decimal,
}

impl ServiceItem {
    pub fn new(name: impl Into<String>, amount: Decimal, quantity: Decimal) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReceiptError::Validation(
                "Service name must not be empty".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(ReceiptError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        if quantity <= Decimal::ZERO {
            return Err(ReceiptError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }
        Ok(Self {
            name,
            amount,
            quantity,
        })
    }

    /// Builds an item from binary floats, converting each through its shortest
    /// decimal representation so that `19.99` stays `19.99`.
    pub fn from_f64(name: impl Into<String>, amount: f64, quantity: f64) -> Result<Self> {
        Self::new(
            name,
            decimal_from_f64(amount, "amount")?,
            decimal_from_f64(quantity, "quantity")?,
        )
    }

    /// Returns `amount * quantity`.
    pub fn total_amount(&self) -> Result<Decimal> {
        self.amount.checked_mul(self.quantity).ok_or_else(|| {
            ReceiptError::Validation(format!(
                "Total amount overflows: {} * {}",
                self.amount, self.quantity
            ))
        })
    }
}

fn decimal_from_f64(value: f64, field: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(ReceiptError::Validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Decimal::from_str(&value.to_string()).map_err(|e| {
        ReceiptError::Validation(format!("{field} {value} is not a valid decimal: {e}"))
    })
}

/// Body of the `POST /income` call.
#[derive(Debug, Serialize, Clone)]
pub struct IncomeRequest {
    pub operation_time: AtomDateTime,
    pub request_time: AtomDateTime,
    pub services: Vec<ServiceItem>,
    pub total_amount: String,
    pub client: IncomeClient,
    pub payment_type: PaymentType,
    pub ignore_max_total_income_restriction: bool,
}

impl IncomeRequest {
    /// Builds an account-transfer request for a single item.
    ///
    /// `request_time` is always the current time; `operation_time` falls back to it
    /// when not given.
    pub fn for_item(
        item: ServiceItem,
        client: IncomeClient,
        operation_time: Option<AtomDateTime>,
    ) -> Result<Self> {
        let total_amount = item.total_amount()?;
        let request_time = AtomDateTime::now();
        Ok(Self {
            operation_time: operation_time.unwrap_or(request_time),
            request_time,
            services: vec![item],
            total_amount: total_amount.to_string(),
            client,
            payment_type: PaymentType::Account,
            ignore_max_total_income_restriction: false,
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
