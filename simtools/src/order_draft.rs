//! The step-by-step order intake accumulator.
//!
//! Order collection happens across several prompts (operator, tariff, fulfilment mode, identity fields, document
//! references). [`OrderDraft`] accumulates the answers one step at a time and only hands a [`NewOrder`] to the
//! core once every required field is present — the core never sees a half-collected order. Each draft belongs to
//! one buyer's session; there is nothing concurrent about it.
use sim_payment_engine::db_types::{FulfilmentMode, NewOrder, TariffSnapshot};

#[derive(Debug)]
pub struct DraftError(pub String);

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The order draft is incomplete: {} is missing", self.0)
    }
}

impl std::error::Error for DraftError {}

#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    buyer_id: Option<i64>,
    username: Option<String>,
    tariff: Option<TariffSnapshot>,
    mode: Option<FulfilmentMode>,
    transfer_phone: Option<String>,
    full_name: Option<String>,
    region_city: Option<String>,
    passport_photo_1: Option<String>,
    passport_photo_2: Option<String>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buyer(&mut self, buyer_id: i64, username: Option<String>) -> &mut Self {
        self.buyer_id = Some(buyer_id);
        self.username = username;
        self
    }

    pub fn tariff(&mut self, tariff: TariffSnapshot) -> &mut Self {
        self.tariff = Some(tariff);
        self
    }

    pub fn mode(&mut self, mode: FulfilmentMode) -> &mut Self {
        self.mode = Some(mode);
        if mode == FulfilmentMode::New {
            self.transfer_phone = None;
        }
        self
    }

    pub fn transfer_phone(&mut self, phone: &str) -> &mut Self {
        self.transfer_phone = Some(phone.to_string());
        self
    }

    pub fn identity(&mut self, full_name: &str, region_city: &str) -> &mut Self {
        self.full_name = Some(full_name.to_string());
        self.region_city = Some(region_city.to_string());
        self
    }

    pub fn documents(&mut self, photo_1: &str, photo_2: &str) -> &mut Self {
        self.passport_photo_1 = Some(photo_1.to_string());
        self.passport_photo_2 = Some(photo_2.to_string());
        self
    }

    pub fn needs_transfer_phone(&self) -> bool {
        self.mode == Some(FulfilmentMode::Transfer) && self.transfer_phone.is_none()
    }

    /// Produces the finished order, or names the first missing step.
    pub fn complete(&self) -> Result<NewOrder, DraftError> {
        let buyer_id = self.buyer_id.ok_or(DraftError("the buyer".into()))?;
        let tariff = self.tariff.clone().ok_or(DraftError("the tariff".into()))?;
        let mode = self.mode.ok_or(DraftError("the fulfilment mode".into()))?;
        if mode == FulfilmentMode::Transfer && self.transfer_phone.is_none() {
            return Err(DraftError("the phone number to transfer".into()));
        }
        let mut order = NewOrder::new(buyer_id, tariff, mode);
        order.username = self.username.clone();
        order.transfer_phone = self.transfer_phone.clone();
        order.full_name = self.full_name.clone().ok_or(DraftError("the full name".into()))?;
        order.region_city = self.region_city.clone().ok_or(DraftError("the region/city".into()))?;
        order.passport_photo_1 = self.passport_photo_1.clone().ok_or(DraftError("the document photos".into()))?;
        order.passport_photo_2 = self.passport_photo_2.clone().ok_or(DraftError("the document photos".into()))?;
        Ok(order)
    }
}
