// Response formatting. Most bodies are shown exactly as returned; the
// product list is turned into a fixed-width table.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One entry of the `/products` response. Prices are in pence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub description: String,
    pub price: i64,
    #[serde(rename = "quantityCount")]
    pub quantity_count: i64,
}

/// Shape of the `/status` response; other fields are ignored.
#[derive(Deserialize, Debug)]
struct MachineStatus {
    status: String,
}

pub fn parse_products(body: &str) -> Result<Vec<Product>> {
    Ok(serde_json::from_str(body)?)
}

pub fn table_header() -> String {
    format!("{:>5} {:<40} {:<15} {:>5}", "Id", "Product", "Price", "Qty")
}

pub fn product_row(product: &Product) -> String {
    format!(
        "{:>5} {:<40} {:<15.2} {:>5}",
        product.id,
        product.description.trim(),
        product.price as f64 / 100.0,
        product.quantity_count
    )
}

/// Header plus one row per product, newline separated.
pub fn product_table(products: &[Product]) -> String {
    let mut lines = vec![table_header()];
    lines.extend(products.iter().map(product_row));
    lines.join("\n")
}

/// Parse a `/products` body and render it as a table.
pub fn format_products(body: &str) -> Result<String> {
    let products = parse_products(body)?;
    Ok(product_table(&products))
}

/// The `status` field of a `/status` body, if the body has one.
pub fn machine_status(body: &str) -> Option<String> {
    serde_json::from_str::<MachineStatus>(body)
        .ok()
        .map(|s| s.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;

    const COLA: &str = r#"[{"id":1,"description":"Cola","price":150,"quantityCount":10}]"#;

    #[test]
    fn header_has_fixed_widths() {
        let header = table_header();
        assert_eq!(
            header,
            format!("   Id Product{} Price{}   Qty", " ".repeat(33), " ".repeat(10))
        );
        assert_eq!(header.len(), 5 + 1 + 40 + 1 + 15 + 1 + 5);
    }

    #[test]
    fn cola_row_renders_price_in_pounds() {
        let table = format_products(COLA).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);

        let row = lines[1];
        assert_eq!(&row[0..5], "    1");
        assert_eq!(row[6..46].trim_end(), "Cola");
        assert_eq!(row[47..62].trim_end(), "1.50");
        assert_eq!(&row[63..68], "   10");
    }

    #[test]
    fn formatting_is_idempotent() {
        assert_eq!(format_products(COLA).unwrap(), format_products(COLA).unwrap());
    }

    #[test]
    fn descriptions_are_trimmed_and_prices_rounded_to_pence() {
        let body = r#"[
            {"id":12,"description":"  Crisps ","price":65,"quantityCount":3},
            {"id":2,"description":"Water","price":1000,"quantityCount":0}
        ]"#;
        let products = parse_products(body).unwrap();
        assert_eq!(products[0].description, "  Crisps ");
        assert!(product_row(&products[0]).starts_with("   12 Crisps "));
        assert!(product_row(&products[0]).contains(" 0.65 "));
        assert!(product_row(&products[1]).contains(" 10.00 "));
        assert!(product_row(&products[1]).ends_with("    0"));
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(format_products("[]").unwrap(), table_header());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(
            format_products("<html>oops</html>"),
            Err(HarnessError::Parse(_))
        ));
        assert!(matches!(
            format_products(r#"[{"id":1}]"#),
            Err(HarnessError::Parse(_))
        ));
    }

    #[test]
    fn machine_status_reads_status_field() {
        assert_eq!(
            machine_status(r#"{"status":"INACTIVE","extra":1}"#).as_deref(),
            Some("INACTIVE")
        );
        assert_eq!(machine_status("TIMEOUT"), None);
        assert_eq!(machine_status("ERROR"), None);
    }
}
