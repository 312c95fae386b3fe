//! Turns an image file into a `data:` URL small enough to live inside a
//! persisted message.

use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::infra::error::AppError;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

pub fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

pub fn load_data_url(path: &Path) -> Result<String, AppError> {
    let mime = mime_for(path).ok_or_else(|| AppError::ImageType {
        path: path.to_path_buf(),
    })?;

    let metadata = fs::metadata(path).map_err(|source| AppError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > MAX_IMAGE_BYTES {
        return Err(AppError::ImageTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }

    let bytes = fs::read(path).map_err(|source| AppError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
