//! In-app notification service
//!
//! Order placement and status transitions fan out here fire-and-forget: a
//! failed write is logged and never fails the triggering operation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Notification, NotificationKind};

/// Notification service for in-app notifications
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    title: String,
    message: String,
    kind: String,
    reference_id: Option<Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> AppResult<Notification> {
        let kind = NotificationKind::from_str(&self.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown notification kind '{}'", self.kind)))?;
        Ok(Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            title: self.title,
            message: self.message,
            kind,
            reference_id: self.reference_id,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a notification for a user
    pub async fn notify(
        &self,
        recipient_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        reference_id: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, title, message, kind, reference_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(recipient_id)
        .bind(title)
        .bind(message)
        .bind(kind.as_str())
        .bind(reference_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Like [`notify`](Self::notify), but only logs on failure
    pub async fn notify_best_effort(
        &self,
        recipient_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        reference_id: Option<Uuid>,
    ) {
        if let Err(e) = self
            .notify(recipient_id, title, message, kind, reference_id)
            .await
        {
            tracing::warn!("Failed to record notification for {}: {}", recipient_id, e);
        }
    }

    /// A user's notifications, newest first
    pub async fn list(&self, recipient_id: Uuid, limit: Option<i64>) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, title, message, kind, reference_id, is_read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient_id)
        .bind(limit.unwrap_or(50))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(NotificationRow::into_notification)
            .collect()
    }

    /// Count of unread notifications
    pub async fn unread_count(&self, recipient_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, recipient_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }
        Ok(())
    }

    /// Mark everything as read
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1")
            .bind(recipient_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
