use std::fmt;
use std::io::{self, Write};

use crate::provider::{ProviderError, ProviderSession, RemoteImage};
use crate::utilities::data_url::{self, DataUrlError};

#[derive(Debug)]
pub enum StagingError {
    DataUrl(DataUrlError),
    UnrecognizedImage,
    Filesystem(io::Error),
    Upload(ProviderError),
}

impl fmt::Display for StagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUrl(err) => write!(f, "invalid image attachment: {err}"),
            Self::UnrecognizedImage => {
                write!(f, "the image attachment is not in a recognized image format.")
            }
            Self::Filesystem(err) => {
                write!(f, "failed to save the image to a temporary file: {err}")
            }
            Self::Upload(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataUrlError> for StagingError {
    fn from(value: DataUrlError) -> Self {
        Self::DataUrl(value)
    }
}

impl From<io::Error> for StagingError {
    fn from(value: io::Error) -> Self {
        Self::Filesystem(value)
    }
}

/// Materializes a data-URL image as a temporary file and registers it with the
/// provider's file API, returning the durable reference. The temporary file is
/// removed before this returns, whether or not the upload succeeds.
pub async fn stage(
    session: &dyn ProviderSession,
    data_url: &str,
) -> Result<RemoteImage, StagingError> {
    let image = data_url::parse(data_url)?;

    let mime_type = match image.mime_type {
        Some(mime_type) if mime_type.starts_with("image/") => mime_type,
        _ => image::guess_format(&image.data)
            .map_err(|_| StagingError::UnrecognizedImage)?
            .to_mime_type()
            .to_owned(),
    };

    let mut file = tempfile::Builder::new().prefix("lazy-coder-").tempfile()?;

    let uploaded = match file.write_all(&image.data).and_then(|()| file.flush()) {
        Ok(()) => {
            session.upload_file(file.path(), &mime_type).await.map_err(StagingError::Upload)
        }
        Err(err) => Err(StagingError::Filesystem(err)),
    };

    if let Err(err) = file.close() {
        log::warn!("failed to remove the staged image file: {err}");
    }

    uploaded
}
