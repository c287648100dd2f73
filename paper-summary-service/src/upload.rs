use axum::extract::Multipart;

/// A PDF received through the file picker.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed fields of the run form.
#[derive(Debug, Default)]
pub struct FormFields {
    pub model: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Parse the multipart run form. An empty file part counts as no upload.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, String> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                if data.is_empty() {
                    continue;
                }
                if !has_pdf_extension(&filename) {
                    return Err(format!(
                        "PDFファイルのみアップロードできます: {}",
                        filename
                    ));
                }

                fields.file = Some(UploadedFile { filename, data });
            }
            "model" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read model: {}", e))?;
                if !val.trim().is_empty() {
                    fields.model = Some(val);
                }
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn has_pdf_extension(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}
