use axum::body::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// Matches the `NUMERIC(10, 2)` price column.
const PRICE_MAX_SCALE: u32 = 2;
const PRICE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub image_file_name: String,
}

/// Row handed to the store. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: Option<i32>,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub image_file_name: String,
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            brand: product.brand,
            category: product.category,
            price: product.price,
            description: product.description,
            created_at: product.created_at,
            image_file_name: product.image_file_name,
        }
    }
}

impl ProductRecord {
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.brand = fields.brand;
        self.category = fields.category;
        self.price = fields.price;
        self.description = fields.description;
    }
}

/// Validated, editable product columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Raw form as submitted by the client, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Checks every field and splits the form into columns and the
    /// optional image. An empty image part counts as no image.
    pub fn validate(self) -> Result<(ProductFields, Option<ImageUpload>)> {
        let name = required_text("name", self.name)?;
        let brand = required_text("brand", self.brand)?;
        let category = required_text("category", self.category)?;
        let price = parse_price(self.price)?;
        let description = required_text("description", self.description)?;

        let image = match self.image {
            Some(image) if !image.bytes.is_empty() => Some(ImageUpload {
                file_name: sanitize_file_name(&image.file_name)?,
                bytes: image.bytes,
            }),
            _ => None,
        };

        Ok((
            ProductFields {
                name,
                brand,
                category,
                price,
                description,
            },
            image,
        ))
    }
}

/// Rejects missing or blank values. Accepted values are returned as sent.
fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("The {} is required", field))),
    }
}

fn parse_price(value: Option<String>) -> Result<Decimal> {
    let raw = required_text("price", value)?;
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid price: {}", raw.trim())))?;

    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The price cannot be negative".to_string(),
        ));
    }

    if price.normalize().scale() > PRICE_MAX_SCALE {
        return Err(AppError::BadRequest(format!(
            "The price cannot have more than {} decimal places",
            PRICE_MAX_SCALE
        )));
    }

    if price >= PRICE_LIMIT {
        return Err(AppError::BadRequest(format!(
            "The price must be less than {}",
            PRICE_LIMIT
        )));
    }

    Ok(price)
}

/// Keeps only the last path component of a client supplied file name.
fn sanitize_file_name(original: &str) -> Result<String> {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::BadRequest("Invalid image file name".to_string()));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: Some("Widget".to_string()),
            brand: Some("Acme".to_string()),
            category: Some("Tools".to_string()),
            price: Some("9.99".to_string()),
            description: Some("A very useful widget".to_string()),
            image: Some(ImageUpload {
                file_name: "a.png".to_string(),
                bytes: Bytes::from_static(b"PNGDATA"),
            }),
        }
    }

    #[test]
    fn accepts_complete_form() {
        let (fields, image) = form().validate().unwrap();
        assert_eq!(fields.name, "Widget");
        assert_eq!(fields.price, Decimal::new(999, 2));
        assert_eq!(image.unwrap().file_name, "a.png");
    }

    #[test]
    fn rejects_blank_name() {
        let mut f = form();
        f.name = Some("   ".to_string());
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_negative_price() {
        let mut f = form();
        f.price = Some("-1".to_string());
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn accepts_zero_price() {
        let mut f = form();
        f.price = Some("0".to_string());
        assert_eq!(f.validate().unwrap().0.price, Decimal::ZERO);
    }

    #[test]
    fn rejects_unparseable_price() {
        let mut f = form();
        f.price = Some("ten".to_string());
        assert!(f.validate().is_err());
    }

    #[test]
    fn rejects_blank_description() {
        let mut f = form();
        f.description = Some(" \t ".to_string());
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));

        let mut f = form();
        f.description = None;
        assert!(f.validate().is_err());
    }

    #[test]
    fn keeps_submitted_text_unchanged() {
        let mut f = form();
        f.name = Some("  Widget  ".to_string());
        f.brand = Some(" Acme".to_string());
        f.description = Some(" ok ".to_string());

        let (fields, _) = f.validate().unwrap();
        assert_eq!(fields.name, "  Widget  ");
        assert_eq!(fields.brand, " Acme");
        assert_eq!(fields.description, " ok ");
    }

    #[test]
    fn trims_price_before_parsing() {
        let mut f = form();
        f.price = Some(" 12.50 ".to_string());
        assert_eq!(f.validate().unwrap().0.price, Decimal::new(1250, 2));
    }

    #[test]
    fn rejects_price_with_more_than_two_decimals() {
        let mut f = form();
        f.price = Some("9.999".to_string());
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));

        let mut f = form();
        f.price = Some("9.990".to_string());
        assert_eq!(f.validate().unwrap().0.price, Decimal::new(999, 2));
    }

    #[test]
    fn rejects_price_beyond_column_precision() {
        let mut f = form();
        f.price = Some("100000000".to_string());
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));

        let mut f = form();
        f.price = Some("99999999.99".to_string());
        assert_eq!(
            f.validate().unwrap().0.price,
            Decimal::new(9_999_999_999, 2)
        );
    }

    #[test]
    fn empty_image_counts_as_missing() {
        let mut f = form();
        f.image = Some(ImageUpload {
            file_name: "a.png".to_string(),
            bytes: Bytes::new(),
        });
        assert!(f.validate().unwrap().1.is_none());
    }

    #[test]
    fn strips_directories_from_file_name() {
        let mut f = form();
        f.image.as_mut().unwrap().file_name = "../../etc/passwd".to_string();
        assert_eq!(f.validate().unwrap().1.unwrap().file_name, "passwd");

        let mut f = form();
        f.image.as_mut().unwrap().file_name = "C:\\photos\\b.jpg".to_string();
        assert_eq!(f.validate().unwrap().1.unwrap().file_name, "b.jpg");
    }

    #[test]
    fn rejects_dot_file_names() {
        let mut f = form();
        f.image.as_mut().unwrap().file_name = "uploads/..".to_string();
        assert!(f.validate().is_err());
    }
}
