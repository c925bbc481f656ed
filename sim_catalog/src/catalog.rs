use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{data_objects::{Operator, PaymentMethod, Tariff}, CatalogError};

/// On-disk layout of the catalog file. Unknown keys (e.g. the id counters an editor tool might keep) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct CatalogFile {
    #[serde(default)]
    operators: Vec<Operator>,
    #[serde(default)]
    tariffs: Vec<Tariff>,
    #[serde(default)]
    payment_methods: Vec<PaymentMethod>,
}

/// Read-only view over the catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operators: Vec<Operator>,
    tariffs: Vec<Tariff>,
    payment_methods: Vec<PaymentMethod>,
}

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::ReadError(e.to_string()))?;
        let file: CatalogFile = serde_json::from_str(&raw).map_err(|e| CatalogError::JsonError(e.to_string()))?;
        info!(
            "🗂️ Catalog loaded from {}: {} operators, {} tariffs, {} payment methods",
            path.as_ref().display(),
            file.operators.len(),
            file.tariffs.len(),
            file.payment_methods.len()
        );
        Ok(Self { operators: file.operators, tariffs: file.tariffs, payment_methods: file.payment_methods })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw).map_err(|e| CatalogError::JsonError(e.to_string()))?;
        Ok(Self { operators: file.operators, tariffs: file.tariffs, payment_methods: file.payment_methods })
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn operator_by_id(&self, id: i64) -> Option<&Operator> {
        self.operators.iter().find(|o| o.id == id)
    }

    pub fn tariff_by_id(&self, id: i64) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.id == id)
    }

    /// Tariffs a buyer may order for the given operator. Hidden tariffs stay reachable by id so that operators can
    /// share direct links, but they are not listed.
    pub fn public_tariffs_for_operator(&self, operator_id: i64) -> Vec<&Tariff> {
        self.tariffs.iter().filter(|t| t.operator_id == operator_id && t.is_public).collect()
    }

    pub fn active_payment_methods(&self) -> Vec<&PaymentMethod> {
        self.payment_methods.iter().filter(|m| m.is_active).collect()
    }

    pub fn payment_method_by_id(&self, id: i64) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.id == id && m.is_active)
    }
}

#[cfg(test)]
mod test {
    use spg_common::Rubles;

    use super::*;

    const CATALOG_JSON: &str = r#"{
        "operators": [
            {"id": 1, "name": "MTS"},
            {"id": 2, "name": "Megafon"}
        ],
        "tariffs": [
            {"id": 10, "operator_id": 1, "name": "Smart", "description": "30 GB", "monthly_fee": 450, "connection_price": 1500},
            {"id": 11, "operator_id": 1, "name": "Hidden", "connection_price": 900, "is_public": false},
            {"id": 12, "operator_id": 2, "name": "Turbo", "monthly_fee": null, "connection_price": 2000}
        ],
        "payment_methods": [
            {"id": 1, "name": "Sberbank", "details": "2202 2002 0000 0000, Ivan I."},
            {"id": 2, "name": "Tinkoff", "details": "5536 9100 0000 0000", "is_active": false}
        ],
        "next_tariff_id": 13
    }"#;

    #[test]
    fn loads_and_queries() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.operators().len(), 2);
        assert_eq!(catalog.operator_by_id(2).unwrap().name, "Megafon");

        let smart = catalog.tariff_by_id(10).unwrap();
        assert_eq!(smart.connection_price, Rubles::from_rubles(1500));
        assert_eq!(smart.monthly_fee, Some(Rubles::from_rubles(450)));

        let turbo = catalog.tariff_by_id(12).unwrap();
        assert_eq!(turbo.monthly_fee, None);
    }

    #[test]
    fn hidden_tariffs_are_not_listed_but_resolvable() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let listed = catalog.public_tariffs_for_operator(1);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 10);
        assert!(catalog.tariff_by_id(11).is_some());
    }

    #[test]
    fn only_active_payment_methods() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let methods = catalog.active_payment_methods();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "Sberbank");
        assert!(catalog.payment_method_by_id(2).is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Catalog::from_json("{ not json").is_err());
    }
}
