use sqlx::PgPool;

use crate::database::models::online::OnlineEntity;

const ONLINE_COLUMNS: &str =
    "id, session_id, user_id, user_name, source, ip_address, issued_at, expires_at";

/// 在线用户审计操作
pub struct OnlineOperations;

impl OnlineOperations {
    /// 登录成功后写入审计记录
    pub async fn insert(pool: &PgPool, record: &OnlineEntity) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sys_online
                (id, session_id, user_id, user_name, source, ip_address, issued_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.id)
        .bind(&record.session_id)
        .bind(&record.user_id)
        .bind(&record.user_name)
        .bind(&record.source)
        .bind(&record.ip_address)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// 按会话ID删除审计记录
    pub async fn delete_by_session(pool: &PgPool, session_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sys_online WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// 按用户ID删除审计记录
    pub async fn delete_by_user(pool: &PgPool, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sys_online WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// 按用户ID、会话ID或来源IP模糊查询在线记录
    pub async fn query(
        pool: &PgPool,
        query_text: Option<&str>,
    ) -> Result<Vec<OnlineEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM sys_online
            WHERE ($1::text IS NULL
                   OR user_id LIKE '%' || $1 || '%'
                   OR session_id LIKE '%' || $1 || '%'
                   OR ip_address LIKE '%' || $1 || '%')
            ORDER BY issued_at DESC
            "#,
            ONLINE_COLUMNS
        );

        sqlx::query_as::<_, OnlineEntity>(&sql)
            .bind(query_text)
            .fetch_all(pool)
            .await
    }
}
