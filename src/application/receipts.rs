use crate::domain::credentials::Credentials;
use crate::domain::income::{AtomDateTime, IncomeClient, IncomeRequest, ServiceItem};
use crate::domain::ports::IncomeApiBox;
use crate::error::{FailureKind, ReceiptError, Result};
use chrono::{DateTime, TimeZone};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Endpoint that registers income and issues a receipt.
pub const INCOME_PATH: &str = "/income";

/// Response keys that may carry the receipt identifier, in priority order.
pub const RECEIPT_UUID_KEYS: [&str; 3] = ["approvedReceiptUuid", "receiptUuid", "receipt_uuid"];

/// Input for a single-item income receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub item_name: String,
    pub amount: f64,
    pub quantity: f64,
    pub client: Option<IncomeClient>,
    pub operation_time: Option<AtomDateTime>,
}

impl NewIncome {
    /// Creates an income of `amount` for one unit of `item_name`.
    pub fn new(item_name: impl Into<String>, amount: f64) -> Self {
        Self {
            item_name: item_name.into(),
            amount,
            quantity: 1.0,
            client: None,
            operation_time: None,
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn client(mut self, client: IncomeClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn operation_time<Tz: TimeZone>(mut self, operation_time: DateTime<Tz>) -> Self {
        self.operation_time = Some(AtomDateTime::from_datetime(operation_time));
        self
    }
}

/// Registers income with the tax service on behalf of one taxpayer.
///
/// The service is configured once, at construction, when both credential fields
/// are present. An unconfigured service never touches the API and every receipt
/// request yields no result.
///
/// Authentication is lazy: before each receipt the API client is asked whether
/// it already holds a token, and a new one is obtained only if it does not. That
/// check-then-act sequence runs under a per-instance lock so concurrent callers
/// trigger at most one handshake at a time. The `POST` itself is not serialized.
pub struct ReceiptService {
    api: IncomeApiBox,
    credentials: Option<Credentials>,
    auth_lock: Mutex<()>,
}

impl ReceiptService {
    /// Creates a service from raw credential values; the taxpayer id is trimmed.
    pub fn new(api: IncomeApiBox, inn: Option<&str>, password: Option<&str>) -> Self {
        Self::with_credentials(api, Credentials::new(inn, password))
    }

    pub fn with_credentials(api: IncomeApiBox, credentials: Option<Credentials>) -> Self {
        if credentials.is_none() {
            warn!("Nalogo credentials are missing. Receipt sending disabled.");
        }
        Self {
            api,
            credentials,
            auth_lock: Mutex::new(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Makes sure the API client holds a token, fetching one if needed.
    ///
    /// Never panics; every API failure is logged and returned as
    /// [`ReceiptError::Authentication`].
    pub async fn ensure_authenticated(&self) -> Result<()> {
        let Some(credentials) = &self.credentials else {
            return Err(ReceiptError::NotConfigured);
        };

        let _guard = self.auth_lock.lock().await;

        let result = match self.api.current_token().await {
            Ok(Some(_)) => {
                debug!("Reusing the access token held by the API client");
                return Ok(());
            }
            Ok(None) => self.authenticate(credentials).await,
            Err(e) => Err(ReceiptError::Authentication(e)),
        };

        match &result {
            Ok(()) => info!(inn = credentials.inn(), "Nalogo authentication succeeded."),
            Err(e) => error!(inn = credentials.inn(), error = %e, "Nalogo authentication failed."),
        }
        result
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<()> {
        let token = self
            .api
            .create_access_token(credentials)
            .await
            .map_err(ReceiptError::Authentication)?;
        self.api
            .authenticate(token)
            .await
            .map_err(ReceiptError::Authentication)
    }

    /// Creates a receipt and returns its identifier, if the response carried one.
    ///
    /// Unlike [`create_income_receipt`](Self::create_income_receipt) this reports
    /// why a receipt was not created.
    pub async fn try_create_income_receipt(&self, income: NewIncome) -> Result<Option<String>> {
        if !self.is_configured() {
            return Err(ReceiptError::NotConfigured);
        }
        self.ensure_authenticated().await?;

        let item = ServiceItem::from_f64(income.item_name, income.amount, income.quantity)?;
        let request = IncomeRequest::for_item(
            item,
            income.client.unwrap_or_default(),
            income.operation_time,
        )?;
        let body = request.to_json()?;

        let response = self
            .api
            .post_json(INCOME_PATH, &body)
            .await
            .map_err(ReceiptError::Request)?;

        let receipt_uuid = extract_receipt_uuid(&response)?;
        match &receipt_uuid {
            Some(uuid) => info!(receipt_uuid = %uuid, "Nalogo receipt created."),
            None => info!("Nalogo receipt created without a UUID in response."),
        }
        Ok(receipt_uuid)
    }

    /// Creates a receipt, returning `None` on any failure.
    ///
    /// Failures are logged and never propagated.
    pub async fn create_income_receipt(&self, income: NewIncome) -> Option<String> {
        match self.try_create_income_receipt(income).await {
            Ok(receipt_uuid) => receipt_uuid,
            Err(e) => {
                // Missing credentials are reported at construction, auth failures in
                // `ensure_authenticated`.
                if e.kind() == FailureKind::RequestFailed {
                    error!(error = %e, "Failed to create Nalogo receipt.");
                }
                None
            }
        }
    }

    pub async fn close(&self) {}
}

/// Picks the first non-empty string among [`RECEIPT_UUID_KEYS`].
pub fn extract_receipt_uuid(response: &Value) -> Result<Option<String>> {
    let payload = response.as_object().ok_or_else(|| {
        ReceiptError::UnexpectedResponse(format!("expected a JSON object, got {response}"))
    })?;

    Ok(RECEIPT_UUID_KEYS
        .iter()
        .filter_map(|key| payload.get(*key))
        .filter_map(Value::as_str)
        .find(|uuid| !uuid.is_empty())
        .map(str::to_owned))
}
