use axum::extract::Multipart;

use crate::{
    error::Result,
    models::{ImageUpload, ProductForm},
};

/// Binds a multipart product form. Unknown parts are skipped; the image is
/// accepted as either `imageFile` or `image`.
pub async fn extract_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "brand" => form.brand = Some(field.text().await?),
            "category" => form.category = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "imageFile" | "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.image = Some(ImageUpload { file_name, bytes });
            }
            other => tracing::debug!("Ignoring unexpected form field {}", other),
        }
    }

    Ok(form)
}
