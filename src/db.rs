use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::word::Word;
use async_trait::async_trait;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Read-only capability the word listing depends on.
///
/// The HTTP layer only ever talks to this trait, so tests can swap in
/// an in-memory backend instead of a live connection pool.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Ids of every category currently flagged approved. Order is not
    /// significant.
    async fn approved_category_ids(&self) -> Result<Vec<Uuid>, ApiError>;

    /// Approved words belonging to the given categories, ascending by
    /// word text. Callers skip this entirely when `category_ids` is
    /// empty.
    async fn approved_words_in(&self, category_ids: &[Uuid]) -> Result<Vec<Word>, ApiError>;
}

/// PostgreSQL への接続プールを握るリポジトリ層。
/// Deadpool の `Pool` を内部に保持し、読み取りクエリをメソッドとして提供する。
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// 接続プールを構築し、起動時に疎通確認まで実施する。
    ///
    /// # Arguments
    /// * `config` - The database configuration
    ///
    /// # Returns
    /// * `Result<Self, ApiError>` - Database instance or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!(
            "Creating PostgreSQL connection pool for host: {}:{}",
            config.host, config.port
        );

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    /// Deadpool 用の `Config` を組み立ててプールを生成する内部関数。
    /// マネージド Postgres は TLS 接続を要求するため `native_tls` のコネクタを差し込む。
    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);

        match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Disable);
            }
            "prefer" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
            "require" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
            _ => {
                warn!("Unknown SSL mode '{}', defaulting to 'require'", config.ssl_mode);
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
        }

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    /// プールから接続を借りる小さなラッパー。
    /// `PoolError` から `ApiError` への変換はここに集約される。
    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// `SELECT 1` を投げてプールが機能しているか確認する。
    /// `Database::new` の直後に呼ばれ、失敗すれば起動を中断させる。
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client
            .execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// アプリ起動時にテーブル群を CREATE する簡易マイグレーター。
    /// すべて `IF NOT EXISTS` なので何度実行しても安全。
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let enable_uuid = "CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"";
        client.execute(enable_uuid, &[]).await.map_err(|e| {
            error!("Failed to enable UUID extension: {}", e);
            ApiError::Database(format!("UUID extension error: {}", e))
        })?;

        let categories_table = r#"
            CREATE TABLE IF NOT EXISTS categories (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                name VARCHAR(200) NOT NULL,
                approved BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(categories_table, &[]).await.map_err(|e| {
            error!("Failed to create categories table: {}", e);
            ApiError::Database(format!("Categories table creation failed: {}", e))
        })?;

        let categories_approved_index =
            "CREATE INDEX IF NOT EXISTS idx_categories_approved ON categories(approved)";
        client.execute(categories_approved_index, &[]).await.map_err(|e| {
            error!("Failed to create categories approved index: {}", e);
            ApiError::Database(format!("Categories approved index creation failed: {}", e))
        })?;

        let words_table = r#"
            CREATE TABLE IF NOT EXISTS words (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                word VARCHAR(200) NOT NULL,
                category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                approved BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(words_table, &[]).await.map_err(|e| {
            error!("Failed to create words table: {}", e);
            ApiError::Database(format!("Words table creation failed: {}", e))
        })?;

        let words_category_index =
            "CREATE INDEX IF NOT EXISTS idx_words_category_id ON words(category_id)";
        client.execute(words_category_index, &[]).await.map_err(|e| {
            error!("Failed to create words category_id index: {}", e);
            ApiError::Database(format!("Words category_id index creation failed: {}", e))
        })?;

        // The listing sorts on word text, so keep it indexed.
        let words_word_index = "CREATE INDEX IF NOT EXISTS idx_words_word ON words(word)";
        client.execute(words_word_index, &[]).await.map_err(|e| {
            error!("Failed to create words word index: {}", e);
            ApiError::Database(format!("Words word index creation failed: {}", e))
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// 開発用のシードデータを投入する。
    /// 既にカテゴリが存在する場合は何もしないことで、重複挿入を避けている。
    pub async fn seed(&self) -> Result<(), ApiError> {
        info!("Seeding category and word data");

        let client = self.get_connection().await?;

        let count_query = "SELECT COUNT(*) FROM categories";
        let row = client
            .query_one(count_query, &[])
            .await
            .map_err(ApiError::from)?;
        let count: i64 = row.get(0);

        if count > 0 {
            info!("Categories table already contains {} entries, skipping seed", count);
            return Ok(());
        }

        // Third category stays unapproved so its words never surface
        // in the public listing.
        let seed_categories = vec![
            ("fruits", true),
            ("animals", true),
            ("submissions", false),
        ];

        let insert_category = r#"
            INSERT INTO categories (name, approved, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id
        "#;

        let mut category_ids = Vec::new();
        for (name, approved) in seed_categories {
            let row = client
                .query_one(insert_category, &[&name, &approved])
                .await
                .map_err(ApiError::from)?;
            let id: Uuid = row.get(0);

            info!("Seeded category: {} (approved: {})", name, approved);
            category_ids.push(id);
        }

        let seed_words = vec![
            ("apple", category_ids[0], true),
            ("banana", category_ids[0], true),
            ("durian", category_ids[0], false),
            ("cat", category_ids[1], true),
            ("dog", category_ids[1], true),
            ("platypus", category_ids[2], true),
        ];

        let insert_word = r#"
            INSERT INTO words (word, category_id, approved, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
        "#;

        for (word, category_id, approved) in seed_words {
            client
                .execute(insert_word, &[&word, &category_id, &approved])
                .await
                .map_err(ApiError::from)?;

            info!("Seeded word: {} (approved: {})", word, approved);
        }

        info!("Successfully seeded 3 categories and 6 words");
        Ok(())
    }
}

#[async_trait]
impl WordStore for Database {
    /// 承認済みカテゴリの ID だけを一覧で取得する。
    async fn approved_category_ids(&self) -> Result<Vec<Uuid>, ApiError> {
        let client = self.get_connection().await?;
        let query = "SELECT id FROM categories WHERE approved = TRUE";

        let rows = client.query(query, &[]).await.map_err(ApiError::from)?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// 指定カテゴリに属する承認済み単語を、単語の昇順で取得する。
    /// `= ANY($1)` が SQL の `IN` フィルタに相当する。
    async fn approved_words_in(&self, category_ids: &[Uuid]) -> Result<Vec<Word>, ApiError> {
        let client = self.get_connection().await?;
        let query = r#"
            SELECT id, word, category_id, approved, created_at, updated_at
            FROM words
            WHERE approved = TRUE AND category_id = ANY($1)
            ORDER BY word ASC
        "#;

        let rows = client
            .query(query, &[&category_ids])
            .await
            .map_err(ApiError::from)?;

        let words: Vec<Word> = rows
            .iter()
            .map(|row| Word {
                id: row.get(0),
                word: row.get(1),
                category_id: row.get(2),
                approved: row.get(3),
                created_at: row.get(4),
                updated_at: row.get(5),
            })
            .collect();

        Ok(words)
    }
}
