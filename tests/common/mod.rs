use nalogo_receipts::application::receipts::ReceiptService;
use nalogo_receipts::infrastructure::in_memory::InMemoryIncomeApi;

pub const INN: &str = "500100732259";
pub const PASSWORD: &str = "secret";

/// Builds a configured service backed by a clone of `api`.
pub fn configured_service(api: &InMemoryIncomeApi) -> ReceiptService {
    ReceiptService::new(Box::new(api.clone()), Some(INN), Some(PASSWORD))
}
