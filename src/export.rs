use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::LoadError;
use crate::models::{COLUMNS, PRICE, RATINGS, REVIEWS};
use crate::normalizer::CleanProduct;

/// Column renames applied to the exported header.
pub const CSV_RENAMES: [(&str, &str); 3] = [
    (RATINGS, "star_ratings"),
    (REVIEWS, "total_ratings"),
    (PRICE, "price_dollars"),
];

pub fn csv_headers() -> Vec<String> {
    COLUMNS
        .iter()
        .map(|column| {
            CSV_RENAMES
                .iter()
                .find(|(from, _)| from == column)
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| column.clone())
        })
        .collect()
}

pub fn write_csv<W: Write>(writer: W, products: &[CleanProduct]) -> Result<(), LoadError> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    writer.write_record(csv_headers())?;
    for product in products {
        writer.write_record(product.to_row().iter().map(|value| value.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, products: &[CleanProduct]) -> Result<(), LoadError> {
    let file = std::fs::File::create(path)?;
    write_csv(file, products)?;
    info!("Exported {} rows to {}", products.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_renames_three_columns() {
        let headers = csv_headers();
        assert_eq!(headers.len(), 46);
        assert_eq!(
            &headers[..7],
            &["Product_ID", "product", "price_dollars", "star_ratings", "total_ratings", "category", "url"]
        );
        assert!(!headers.iter().any(|h| h == "ratings" || h == "reviews" || h == "price"));
    }

    #[test]
    fn writes_header_and_rows() {
        let product = CleanProduct::builder(ProductId("B1".into()))
            .product("Phone, unlocked")
            .price(19.99)
            .reviews(12)
            .build();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[product]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert!(lines.next().unwrap().starts_with("Product_ID,product,price_dollars,star_ratings,total_ratings"));
        assert!(lines.next().unwrap().starts_with("B1,\"Phone, unlocked\",19.99,0.0,12,,,Unavailable"));
        assert_eq!(lines.next(), None);
    }
}
