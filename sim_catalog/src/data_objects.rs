use serde::{Deserialize, Deserializer, Serialize, Serializer};
use spg_common::Rubles;

/// A mobile network operator the shop sells connections for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
}

/// A tariff offered by an operator. `connection_price` is the one-time charge a buyer pays through the gateway;
/// `monthly_fee` is informational only. Amounts are stored in the catalog file as whole rubles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tariff {
    pub id: i64,
    pub operator_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "opt_rubles_from_whole", serialize_with = "opt_rubles_to_whole")]
    pub monthly_fee: Option<Rubles>,
    #[serde(deserialize_with = "rubles_from_whole", serialize_with = "rubles_to_whole")]
    pub connection_price: Rubles,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

/// A manual settlement channel (bank card, SBP, ...) shown to buyers who choose the bank-transfer flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
    pub details: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn rubles_from_whole<'de, D: Deserializer<'de>>(d: D) -> Result<Rubles, D::Error> {
    i64::deserialize(d).map(Rubles::from_rubles)
}

fn rubles_to_whole<S: Serializer>(v: &Rubles, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(v.value() / 100)
}

fn opt_rubles_from_whole<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Rubles>, D::Error> {
    Ok(Option::<i64>::deserialize(d)?.map(Rubles::from_rubles))
}

fn opt_rubles_to_whole<S: Serializer>(v: &Option<Rubles>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(r) => s.serialize_some(&(r.value() / 100)),
        None => s.serialize_none(),
    }
}
