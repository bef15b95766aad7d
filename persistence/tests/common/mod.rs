//! FILENAME: persistence/tests/common/mod.rs
//! Fixtures for export integration tests.

#![allow(dead_code)]

use engine::{FieldValue, Record};
use uuid::Uuid;

/// Monthly sales figures, one record per product and month.
#[derive(Debug, Clone)]
pub struct Stats {
    pub product: String,
    pub month: String,
    pub ca_net: i32,
    pub ca_brut: i32,
    pub qte_vendue: i32,
    pub guid: Uuid,
}

impl Record for Stats {
    fn field_names(&self) -> Vec<&str> {
        vec!["PRODUCT", "MONTH", "CA_NET", "CA_BRUT", "QTE_VENDUE", "GUID"]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "PRODUCT" => self.product.clone().into(),
            "MONTH" => self.month.clone().into(),
            "CA_NET" => self.ca_net.into(),
            "CA_BRUT" => self.ca_brut.into(),
            "QTE_VENDUE" => self.qte_vendue.into(),
            "GUID" => self.guid.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Deterministic dataset: `products` products x 12 months.
pub struct SalesFixture;

impl SalesFixture {
    pub fn records(products: usize) -> impl Iterator<Item = Stats> {
        (0..products).flat_map(|p| {
            let guid = Uuid::from_u128(p as u128 + 1);
            (1..=12).map(move |m| Stats {
                product: format!("TEST{}", p),
                month: format!("2022-{:02}", m),
                ca_net: ((p * 7 + m) % 100) as i32,
                ca_brut: ((p * 13 + m) % 200) as i32,
                qte_vendue: ((p * 3 + m) % 100) as i32,
                guid,
            })
        })
    }

    pub fn headers() -> Vec<&'static str> {
        vec!["PRODUCT", "MONTH", "CA_NET", "CA_BRUT", "QTE_VENDUE", "GUID"]
    }
}
