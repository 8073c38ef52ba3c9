use crate::domain::model::Category;
use crate::domain::ports::{ContentProvider, Storage};
use crate::utils::error::{CmsError, Result};
use serde::Deserialize;

pub const CATEGORY_CSV_HEADER: &str = "id,name,slug,color\n";
pub const DEFAULT_EXPORT_FILE: &str = "categories.csv";

/// 標題列不加引號，資料列每個欄位都加引號
pub fn export_categories_csv(categories: &[Category]) -> Result<String> {
    let mut buffer = CATEGORY_CSV_HEADER.as_bytes().to_vec();

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buffer);

        for category in categories {
            writer.write_record([
                category.id.as_str(),
                category.name.as_str(),
                category.slug.as_str(),
                category.color.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
    }

    String::from_utf8(buffer)
        .map_err(|e| CmsError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    #[serde(default)]
    color: String,
}

pub fn parse_categories_csv(data: &str) -> Result<Vec<Category>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let mut categories = Vec::new();
    for row in reader.deserialize::<CategoryRow>() {
        let row = row?;
        categories.push(Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            color: Some(row.color).filter(|color| !color.is_empty()),
            language: None,
        });
    }
    Ok(categories)
}

pub struct CategoryExporter<S: Storage> {
    storage: S,
    output_path: String,
}

impl<S: Storage> CategoryExporter<S> {
    pub fn new(storage: S, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
        }
    }

    /// 寫出 CSV 並回傳儲存路徑
    pub async fn export(&self, categories: &[Category], file_name: &str) -> Result<String> {
        let csv = export_categories_csv(categories)?;
        tracing::debug!(
            "Writing {} categories ({} bytes) to storage",
            categories.len(),
            csv.len()
        );
        self.storage.write_file(file_name, csv.as_bytes()).await?;

        let saved_path = format!("{}/{}", self.output_path.trim_end_matches('/'), file_name);
        tracing::info!("📁 Exported {} categories to {}", categories.len(), saved_path);
        Ok(saved_path)
    }

    pub async fn export_from<P: ContentProvider>(&self, provider: &P, file_name: &str) -> Result<String> {
        let categories = provider.fetch_categories().await?;
        self.export(&categories, file_name).await
    }
}
