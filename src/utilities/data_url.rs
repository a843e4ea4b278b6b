use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, PartialEq, Eq)]
pub enum DataUrlError {
    NotADataUrl,
    NotBase64,
    Payload(base64::DecodeError),
}

impl fmt::Display for DataUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADataUrl => write!(f, "not a data URL"),
            Self::NotBase64 => write!(f, "the data URL is not base64-encoded"),
            Self::Payload(err) => write!(f, "invalid base64 payload: {err}"),
        }
    }
}

#[derive(Debug)]
pub struct DataUrl {
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// parses a `data:<mime>;base64,<payload>` URL, as produced by `FileReader.readAsDataURL`
pub fn parse(value: &str) -> Result<DataUrl, DataUrlError> {
    let value = value.strip_prefix("data:").ok_or(DataUrlError::NotADataUrl)?;
    let (header, payload) = value.split_once(',').ok_or(DataUrlError::NotADataUrl)?;
    let mime_type = header.strip_suffix(";base64").ok_or(DataUrlError::NotBase64)?;
    let data = STANDARD.decode(payload).map_err(DataUrlError::Payload)?;

    Ok(DataUrl {
        mime_type: if mime_type.is_empty() { None } else { Some(mime_type.to_owned()) },
        data,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let image = parse("data:image/png;base64,aGVsbG8=").unwrap();

        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        assert_eq!(image.data, b"hello");
    }

    #[test]
    fn test_parse_without_mime_type() {
        let image = parse("data:;base64,aGVsbG8=").unwrap();

        assert_eq!(image.mime_type, None);
        assert_eq!(image.data, b"hello");
    }

    #[test]
    fn test_parse_rejects_other_urls() {
        assert_eq!(
            parse("https://example.com/image.png").unwrap_err(),
            DataUrlError::NotADataUrl
        );

        assert_eq!(parse("data:image/png+aGVsbG8=").unwrap_err(), DataUrlError::NotADataUrl);
    }

    #[test]
    fn test_parse_rejects_unencoded_payloads() {
        assert_eq!(parse("data:text/plain,hello").unwrap_err(), DataUrlError::NotBase64);
    }

    #[test]
    fn test_parse_rejects_invalid_base64() {
        assert!(matches!(
            parse("data:image/png;base64,?!").unwrap_err(),
            DataUrlError::Payload(_)
        ));
    }
}
