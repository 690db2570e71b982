use serde::Serialize;
use std::fmt;

/// Coarse client category derived from the `User-Agent` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a client identity string. iOS markers win over Android.
pub fn classify_platform(client_identity: &str) -> Platform {
    let identity = client_identity.to_ascii_lowercase();

    if ["iphone", "ipad", "ios"]
        .iter()
        .any(|marker| identity.contains(marker))
    {
        Platform::Ios
    } else if identity.contains("android") {
        Platform::Android
    } else {
        Platform::Desktop
    }
}
