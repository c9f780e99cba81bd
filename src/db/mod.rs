use std::time::Duration;

use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};

use crate::{
    config::{Config, MongoPoolSettings},
    errors::AppResult,
};

/// Handle to the service's MongoDB database, shared by the repositories.
#[derive(Clone)]
pub struct Database {
    db: mongodb::Database,
}

fn apply_pool_settings(options: &mut ClientOptions, pool: MongoPoolSettings) {
    let timeout = Duration::from_secs(pool.timeout_seconds);

    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(pool.max_pool_size);
    options.min_pool_size = Some(pool.min_pool_size);
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
}

impl Database {
    /// Connects and pings once, so an unreachable server fails startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        apply_pool_settings(&mut options, config.mongo_pool);

        let client = Client::with_options(options)?;
        let database = Self {
            db: client.database(&config.mongo_db_name),
        };
        database.ping().await?;

        log::info!(
            "Connected to MongoDB database '{}' (pool {}..{})",
            config.mongo_db_name,
            config.mongo_pool.min_pool_size,
            config.mongo_pool.max_pool_size
        );
        Ok(database)
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(collection_name)
    }

    pub async fn ensure_unique_index(&self, collection_name: &str, field: &str) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(format!("{}_unique", field))
                    .build(),
            )
            .build();

        self.get_collection::<Document>(collection_name)
            .create_index(model)
            .await?;
        log::info!("Ensured unique index on {}.{}", collection_name, field);
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
