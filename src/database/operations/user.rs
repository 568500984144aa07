use sqlx::PgPool;

use crate::database::models::user::{UserEntity, UserProfileUpdate};

const USER_COLUMNS: &str = "user_id, user_name, nick_name, email, phone, password, \
     enabled, one_session, is_admin, remark, create_time, update_time";

/// 用户数据操作
pub struct UserOperations;

impl UserOperations {
    /// 按用户ID查询账户
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM sys_users WHERE user_id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserEntity>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// 更新用户资料，返回受影响行数
    pub async fn update_profile(
        pool: &PgPool,
        update: &UserProfileUpdate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE sys_users
            SET user_name = $2,
                nick_name = $3,
                email = $4,
                phone = $5,
                remark = $6,
                enabled = $7,
                one_session = $8,
                update_time = now()
            WHERE user_id = $1
            "#,
        )
        .bind(&update.user_id)
        .bind(&update.user_name)
        .bind(&update.nick_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.remark)
        .bind(update.enabled)
        .bind(update.one_session)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// 删除用户，返回受影响行数
    pub async fn delete(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sys_users WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
