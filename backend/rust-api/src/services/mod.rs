use crate::config::Config;
use mongodb::Client as MongoClient;
use std::sync::Arc;

use quiz_store::{MongoQuizStore, QuizStore};
use user_store::{MongoUserStore, UserStore};

pub struct AppState {
    pub config: Config,
    pub quizzes: Arc<dyn QuizStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        let quizzes: Arc<dyn QuizStore> = Arc::new(MongoQuizStore::new(mongo.clone()));
        let users: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(mongo));

        tracing::info!("Pinging MongoDB...");

        tokio::time::timeout(std::time::Duration::from_secs(5), quizzes.ping())
            .await
            .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;

        tracing::info!("MongoDB connection established successfully");

        Ok(Self::with_stores(config, quizzes, users))
    }

    /// Builds state over arbitrary store implementations (in-memory stores in tests).
    pub fn with_stores(
        config: Config,
        quizzes: Arc<dyn QuizStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            quizzes,
            users,
        }
    }
}

pub mod bookmark_service;
pub mod quiz_store;
pub mod study_service;
pub mod user_store;
