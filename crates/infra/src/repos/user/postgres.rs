use super::IUserRepo;
use duesoon_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    email: String,
    name: String,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            email: raw.email,
            name: raw.name,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, email, name)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.email)
        .bind(&user.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(|u| u.into()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(|u| u.into()))
    }
}
