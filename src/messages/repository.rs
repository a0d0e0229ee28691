use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::messages::{
    error::MessageError,
    models::{Message, NewMessage},
};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<Message, MessageError>;

    /// Every message, newest first
    async fn list_all(&self) -> Result<Vec<Message>, MessageError>;
}

/// Postgres-backed message repository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, MessageError> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, first_name, last_name, email, phone, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, phone, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&message.first_name)
        .bind(&message.last_name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Message>, MessageError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, first_name, last_name, email, phone, message, created_at
            FROM messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
