//! Multipart form plumbing shared by the upload-carrying pages.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::AppError;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl MultipartForm {
    /// Drain a multipart body into text fields and uploaded files. File
    /// inputs left empty by the browser (no filename or no bytes) are
    /// dropped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed form upload: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);

            match filename {
                Some(filename) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Malformed form upload: {e}")))?;
                    if !filename.is_empty() && !bytes.is_empty() {
                        form.files.push(UploadedFile {
                            field: name,
                            filename,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Malformed form upload: {e}")))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn checkbox(&self, name: &str) -> bool {
        matches!(
            self.fields.get(name).map(String::as_str),
            Some("on" | "true" | "1")
        )
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(|v| v.trim().parse().ok())
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// First uploaded file for `name`, if any.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|file| file.field == name)
    }

    pub fn files(&self, name: &str) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter().filter(move |file| file.field == name)
    }
}
