use sqlx::PgPool;

use crate::contacts::models::{Contact, ContactStatus, CreateContactRequest};
use crate::error::ApiError;

const CONTACT_COLUMNS: &str = "id, name, email, message, status, created_at, updated_at";

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<ContactStatus>) -> Result<Vec<Contact>, ApiError> {
        let mut sql = format!(
            "SELECT {} FROM contacts WHERE deleted_at IS NULL",
            CONTACT_COLUMNS
        );
        if status.is_some() {
            sql.push_str(" AND status = $1");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, Contact>(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// New messages always start in the `new` state
    pub async fn create(&self, contact: &CreateContactRequest) -> Result<Contact, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO contacts (name, email, message, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );

        let created = sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.name.trim())
            .bind(contact.email.trim())
            .bind(&contact.message)
            .bind(ContactStatus::New)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: ContactStatus,
    ) -> Result<Option<Contact>, ApiError> {
        let sql = format!(
            r#"
            UPDATE contacts SET status = $1, updated_at = NOW()
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );

        let updated = sqlx::query_as::<_, Contact>(&sql)
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
