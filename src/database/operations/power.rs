use sqlx::PgPool;
use uuid::Uuid;

/// 权限数据操作
///
/// 权限快照在登录和管理侧变更时计算，请求路径不做这些连表查询
pub struct PowerOperations;

impl PowerOperations {
    /// 计算用户经角色获得的全部权限标识
    pub async fn powers_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT rp.power_uid
            FROM sys_user_roles ur
            JOIN sys_role_powers rp ON rp.role_uid = ur.role_uid
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 查询持有指定角色的用户ID列表
    pub async fn users_in_role(pool: &PgPool, role_id: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT user_id FROM sys_user_roles WHERE role_uid = $1")
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// 查询角色当前的权限标识列表
    pub async fn role_powers(pool: &PgPool, role_id: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT power_uid FROM sys_role_powers WHERE role_uid = $1")
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// 整体替换角色的权限集合
    ///
    /// 删除与插入放在同一事务里，任一步失败即整体回滚
    pub async fn replace_role_powers(
        pool: &PgPool,
        role_id: &str,
        power_ids: &[String],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM sys_role_powers WHERE role_uid = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        for power_id in power_ids {
            sqlx::query("INSERT INTO sys_role_powers (id, role_uid, power_uid) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4().to_string())
                .bind(role_id)
                .bind(power_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }
}
