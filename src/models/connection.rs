// Broker connection profiles managed through /api/connections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
    Testing,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerConnection {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub jmx_url: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub last_tested: Option<String>,
    #[serde(default)]
    pub last_test_status: ConnectionStatus,
    #[serde(default)]
    pub last_test_message: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub environment: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConnectionRequest {
    #[serde(flatten)]
    pub connection: CreateConnectionRequest,
    pub active: bool,
}

impl UpdateConnectionRequest {
    /// Rebuilds an update payload from a stored connection.
    pub fn from_connection(connection: &BrokerConnection, active: bool) -> Self {
        Self {
            connection: CreateConnectionRequest {
                name: connection.name.clone(),
                host: connection.host.clone(),
                port: connection.port,
                username: connection.username.clone(),
                // Stored connections never echo the password back.
                password: Some(String::new()),
                environment: connection.environment.clone(),
                description: connection.description.clone(),
            },
            active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionRequest {
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResponse {
    pub status: String,
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}
