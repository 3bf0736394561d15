use std::{convert::TryFrom, fmt};

/// External services skypeek talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    /// Tomorrow.io forecast API.
    Tomorrow,
    /// OpenCage forward geocoding API.
    OpenCage,
    /// ipapi.co IP geolocation, used as the device location sensor.
    IpApi,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Tomorrow => "tomorrow",
            ServiceId::OpenCage => "opencage",
            ServiceId::IpApi => "ipapi",
        }
    }

    /// Services that need an API key.
    pub const fn keyed() -> &'static [ServiceId] {
        &[ServiceId::Tomorrow, ServiceId::OpenCage]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceId::Tomorrow => "Tomorrow.io",
            ServiceId::OpenCage => "OpenCage",
            ServiceId::IpApi => "ipapi.co",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ServiceId::Tomorrow => "https://api.tomorrow.io",
            ServiceId::OpenCage => "https://api.opencagedata.com",
            ServiceId::IpApi => "https://ipapi.co",
        }
    }

    /// Environment variable that overrides the configured API key.
    pub fn api_key_env(&self) -> String {
        format!("SKYPEEK_{}_API_KEY", self.as_str().to_uppercase())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "tomorrow" | "tomorrow.io" => Ok(ServiceId::Tomorrow),
            "opencage" => Ok(ServiceId::OpenCage),
            "ipapi" => Ok(ServiceId::IpApi),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: tomorrow, opencage, ipapi."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_id_as_str_roundtrip() {
        for id in [ServiceId::Tomorrow, ServiceId::OpenCage, ServiceId::IpApi] {
            let parsed = ServiceId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn unknown_service_error() {
        let err = ServiceId::try_from("openweather").unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ServiceId::try_from(" OpenCage ").unwrap(), ServiceId::OpenCage);
        assert_eq!(ServiceId::try_from("Tomorrow.io").unwrap(), ServiceId::Tomorrow);
    }

    #[test]
    fn api_key_env_names() {
        assert_eq!(ServiceId::Tomorrow.api_key_env(), "SKYPEEK_TOMORROW_API_KEY");
        assert_eq!(ServiceId::OpenCage.api_key_env(), "SKYPEEK_OPENCAGE_API_KEY");
    }

    #[test]
    fn ipapi_needs_no_key() {
        assert!(!ServiceId::keyed().contains(&ServiceId::IpApi));
    }
}
