use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::graphql::{self, StudentsSchema};
use crate::config::StudentsConfig;
use crate::contract::client::StudentsApi;
use crate::domain::repo::StudentsRepository;
use crate::domain::service::Service;
use crate::gateways::local::StudentsLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmStudentsRepository;
use crate::infra::storage::unavailable_repo::UnavailableStudentsRepository;

/// Wiring of the students module: repository, service, schema and routes.
#[derive(Clone)]
pub struct Students {
    config: StudentsConfig,
    service: Arc<Service>,
    schema: StudentsSchema,
}

impl Students {
    /// Build the module on top of a live SeaORM connection.
    pub fn init(conn: DatabaseConnection, config: StudentsConfig) -> Self {
        Self::from_repo(Arc::new(SeaOrmStudentsRepository::new(conn)), config)
    }

    /// Build the module without a store. Every operation fails and
    /// resolvers report `STORE_UNAVAILABLE`.
    pub fn unavailable(config: StudentsConfig) -> Self {
        Self::from_repo(Arc::new(UnavailableStudentsRepository), config)
    }

    fn from_repo(repo: Arc<dyn StudentsRepository>, config: StudentsConfig) -> Self {
        info!(path = %config.path, graphiql = config.graphiql, "Initializing students module");
        let service = Arc::new(Service::new(repo));
        let schema = graphql::build_schema(service.clone());
        Self {
            config,
            service,
            schema,
        }
    }

    pub async fn migrate(conn: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running students database migrations");
        Migrator::up(conn, None).await?;
        info!("Students database migrations completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &StudentsConfig {
        &self.config
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn StudentsApi> {
        Arc::new(StudentsLocalClient::new(self.service.clone()))
    }

    pub fn schema(&self) -> StudentsSchema {
        self.schema.clone()
    }

    pub fn router(&self) -> axum::Router {
        info!("Registering students GraphQL routes at {}", self.config.path);
        graphql::router(self.schema.clone(), &self.config)
    }
}
