use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{endpoints, BrokerApiClient};
use crate::error::{ConsoleError, Result};
use crate::models::{
    BrokerConnection, ConnectionStatus, CreateConnectionRequest, TestConnectionRequest,
    TestConnectionResponse, UpdateConnectionRequest,
};

/// CRUD and health checks for stored broker connections. Nothing here is cached.
pub struct ConnectionService {
    api: Arc<BrokerApiClient>,
}

impl ConnectionService {
    pub fn new(api: Arc<BrokerApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<BrokerConnection>> {
        let response = self.api.get(endpoints::CONNECTIONS, None).await?;
        Ok(response.json().await?)
    }

    /// The connection the backend currently routes broker calls to, if any.
    pub async fn active(&self) -> Result<Option<BrokerConnection>> {
        match self.api.get(endpoints::ACTIVE_CONNECTION, None).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ConsoleError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: &str) -> Result<BrokerConnection> {
        let response = self.api.get(&endpoints::connection(id), None).await?;
        Ok(response.json().await?)
    }

    pub async fn create(&self, request: &CreateConnectionRequest) -> Result<BrokerConnection> {
        let response = self.api.post_json(endpoints::CONNECTIONS, None, request).await?;
        let created: BrokerConnection = response.json().await?;
        info!("Created connection {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: &str, request: &UpdateConnectionRequest) -> Result<BrokerConnection> {
        let response = self.api.put_json(&endpoints::connection(id), request).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&endpoints::connection(id), None).await?;
        info!("Deleted connection {}", id);
        Ok(())
    }

    /// Runs the backend's connectivity test for a stored connection.
    pub async fn test(&self, id: &str) -> Result<BrokerConnection> {
        let response = self.api.post(&endpoints::connection_test(id), None).await?;
        Ok(response.json().await?)
    }

    /// Tests connection settings that have not been saved yet.
    pub async fn test_config(&self, request: &TestConnectionRequest) -> Result<TestConnectionResponse> {
        let response = self
            .api
            .post_json(endpoints::TEST_CONNECTION_CONFIG, None, request)
            .await?;
        Ok(response.json().await?)
    }

    /// Marks a connection active, but only after it passes a connectivity test.
    pub async fn activate(&self, id: &str) -> Result<BrokerConnection> {
        debug!("Testing connection {} before activating", id);
        let tested = self.test(id).await?;
        if tested.last_test_status != ConnectionStatus::Connected {
            return Err(ConsoleError::ConnectionFailed(
                tested
                    .last_test_message
                    .unwrap_or_else(|| "Could not reach the broker".to_string()),
            ));
        }

        let target = self
            .list()
            .await?
            .into_iter()
            .find(|connection| connection.id == id)
            .ok_or_else(|| ConsoleError::NotFound(endpoints::connection(id)))?;

        let activated = self
            .update(id, &UpdateConnectionRequest::from_connection(&target, true))
            .await?;
        info!("Activated connection {}", activated.name);
        Ok(activated)
    }
}
