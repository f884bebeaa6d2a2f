//! Registration request payload

use serde::{Deserialize, Deserializer};

/// Password as submitted by the client
///
/// Clients send either a JSON string or a bare number; both are kept as text.
/// A missing or `null` password does not deserialize.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Not routed through `Option`: serde feeds missing fields to
        // `deserialize_option`, which would turn them into an empty password.
        Ok(Password(Text::deserialize(deserializer)?.into_string()))
    }
}

/// Body of `POST /api/v1/auth/register`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub phone: String,
    pub password: Password,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub device_code: String,
    #[serde(default, deserialize_with = "deserialize_name")]
    pub name: Option<String>,
}

impl RegistrationRequest {
    pub fn new(
        phone: impl Into<String>,
        password: impl Into<String>,
        device_code: impl Into<String>,
    ) -> Self {
        Self {
            phone: phone.into(),
            password: Password::new(password),
            device_code: device_code.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Number(serde_json::Number),
}

impl Text {
    fn into_string(self) -> String {
        match self {
            Text::String(s) => s,
            Text::Number(n) => n.to_string(),
        }
    }
}

/// Accepts a string, a number or null; null becomes the empty string
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?
        .map(Text::into_string)
        .unwrap_or_default())
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = deserialize_text(deserializer)?;
    Ok(if name.is_empty() { None } else { Some(name) })
}
