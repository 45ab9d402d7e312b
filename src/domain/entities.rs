//! Domain entities: ACL tokens, policies and the bootstrap request

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::DomainError;

/// Scope of an ACL token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenType {
    /// Full administrative privilege; policies do not apply.
    Management,
    /// Privileges granted by the attached policies.
    Client,
}

impl TokenType {
    /// Whether attached policies carry meaning for this token type.
    pub fn applies_policies(self) -> bool {
        match self {
            TokenType::Management => false,
            TokenType::Client => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Management => "management",
            TokenType::Client => "client",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "management" => Ok(TokenType::Management),
            "client" => Ok(TokenType::Client),
            other => Err(DomainError::UnknownTokenType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TokenType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenType> for String {
    fn from(value: TokenType) -> Self {
        value.as_str().to_string()
    }
}

/// ACL token as returned by the control plane.
///
/// Serialized field names follow the control plane's JSON wire format.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclToken {
    #[serde(rename = "AccessorID")]
    pub accessor_id: String,
    #[serde(rename = "SecretID")]
    pub secret_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Type")]
    pub token_type: TokenType,
    #[serde(rename = "Global", default)]
    pub global: bool,
    #[serde(rename = "Policies", default, deserialize_with = "null_as_empty")]
    pub policies: Vec<String>,
    #[serde(rename = "CreateTime")]
    pub create_time: DateTime<Utc>,
    #[serde(rename = "CreateIndex", default)]
    pub create_index: u64,
    #[serde(rename = "ModifyIndex", default)]
    pub modify_index: u64,
}

impl AclToken {
    /// Check the invariants a freshly issued token must satisfy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.accessor_id.is_empty() {
            return Err(DomainError::MissingField("AccessorID"));
        }
        if self.secret_id.is_empty() {
            return Err(DomainError::MissingField("SecretID"));
        }
        check_index_order(self.create_index, self.modify_index)
    }
}

// Secret material stays out of logs and panic messages.
impl fmt::Debug for AclToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclToken")
            .field("accessor_id", &self.accessor_id)
            .field("secret_id", &"<redacted>")
            .field("name", &self.name)
            .field("token_type", &self.token_type)
            .field("global", &self.global)
            .field("policies", &self.policies)
            .field("create_time", &self.create_time)
            .field("create_index", &self.create_index)
            .field("modify_index", &self.modify_index)
            .finish()
    }
}

/// Named ACL policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclPolicy {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Rule-language text, opaque to this crate.
    #[serde(rename = "Rules", default)]
    pub rules: String,
    #[serde(rename = "CreateIndex", default)]
    pub create_index: u64,
    #[serde(rename = "ModifyIndex", default)]
    pub modify_index: u64,
}

impl AclPolicy {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::MissingField("Name"));
        }
        check_index_order(self.create_index, self.modify_index)
    }
}

/// Request body of the bootstrap exchange.
///
/// An empty secret means the control plane mints the management token itself.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapRequest {
    #[serde(rename = "BootstrapSecret")]
    pub operator_secret: String,
}

impl BootstrapRequest {
    pub fn new(operator_secret: impl Into<String>) -> Self {
        Self {
            operator_secret: operator_secret.into(),
        }
    }

    /// True when the exchange is authorized by an operator-supplied secret.
    pub fn is_operator_authorized(&self) -> bool {
        !self.operator_secret.is_empty()
    }
}

impl fmt::Debug for BootstrapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapRequest")
            .field("operator_authorized", &self.is_operator_authorized())
            .finish()
    }
}

fn check_index_order(create_index: u64, modify_index: u64) -> Result<(), DomainError> {
    if modify_index < create_index {
        return Err(DomainError::IndexOrder {
            create_index,
            modify_index,
        });
    }
    Ok(())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
