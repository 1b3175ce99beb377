use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Remote media store backends
///
/// Defined in core because configuration selects the backend before any
/// storage client exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    ImageKit,
    Local,
}

impl FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imagekit" => Ok(MediaBackend::ImageKit),
            "local" => Ok(MediaBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media storage backend: {}", s)),
        }
    }
}

impl Display for MediaBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackend::ImageKit => write!(f, "imagekit"),
            MediaBackend::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_is_case_insensitive() {
        assert_eq!("ImageKit".parse::<MediaBackend>().unwrap(), MediaBackend::ImageKit);
        assert_eq!(" local ".parse::<MediaBackend>().unwrap(), MediaBackend::Local);
        assert!("s3".parse::<MediaBackend>().is_err());
    }
}
