// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{CatalogRepository, GrowthRepository, SalesRepository, SellInRepository, StockRepository},
    services::{
        CatalogService, ForecastService, GrowthService, SalesService, SellInService, StockService,
        TrendService,
    },
};
use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, str::FromStr, time::Duration};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;

// ---
// Configuração lida do ambiente (.env via dotenvy)
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout_ms: Option<u64>,
    pub cors_allowed_origin: Option<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Mesma leitura de `from_env`, mas com uma fonte qualquer (testes).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = value("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL deve ser definida"))?;

        Ok(Self {
            database_url,
            bind_addr: parse_or("BIND_ADDR", value("BIND_ADDR"), || {
                SocketAddr::from_str(DEFAULT_BIND_ADDR).context("endereço padrão inválido")
            })?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", value("DB_MAX_CONNECTIONS"), || {
                Ok(DEFAULT_MAX_CONNECTIONS)
            })?,
            acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                value("DB_ACQUIRE_TIMEOUT_SECS"),
                || Ok(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            )?),
            statement_timeout_ms: value("DB_STATEMENT_TIMEOUT_MS")
                .map(|raw| parse_value::<u64>("DB_STATEMENT_TIMEOUT_MS", &raw))
                .transpose()?,
            cors_allowed_origin: value("CORS_ALLOWED_ORIGIN"),
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} inválido: {raw}"))
}

fn parse_or<T, D>(key: &str, raw: Option<String>, default: D) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    D: FnOnce() -> anyhow::Result<T>,
{
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => default(),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub sales_service: SalesService,
    pub sell_in_service: SellInService,
    pub stock_service: StockService,
    pub growth_service: GrowthService,
    pub trend_service: TrendService,
    pub forecast_service: ForecastService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut options = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout);

        if let Some(timeout_ms) = settings.statement_timeout_ms {
            options = options.after_connect(move |conn, _meta| {
                Box::pin(async move {
                    let sql = format!("SET statement_timeout = {timeout_ms}");
                    sqlx::query(&sql).execute(&mut *conn).await?;
                    Ok(())
                })
            });
        }

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = options
            .connect(&settings.database_url)
            .await
            .context("falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool) -> Self {
        let sales_repo = SalesRepository::new();
        let stock_repo = StockRepository::new();

        Self {
            db_pool,
            i18n_store: I18nStore::new(),
            sales_service: SalesService::new(sales_repo.clone()),
            sell_in_service: SellInService::new(SellInRepository::new()),
            stock_service: StockService::new(stock_repo.clone()),
            growth_service: GrowthService::new(GrowthRepository::new()),
            trend_service: TrendService::new(sales_repo.clone(), stock_repo),
            forecast_service: ForecastService::new(sales_repo),
            catalog_service: CatalogService::new(CatalogRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let settings = settings_from(&[("DATABASE_URL", "postgres://localhost/pharma")]).unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.statement_timeout_ms, None);
        assert_eq!(settings.cors_allowed_origin, None);
    }

    #[test]
    fn database_url_is_required() {
        assert!(settings_from(&[]).is_err());
        assert!(settings_from(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://db/pharma"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DB_STATEMENT_TIMEOUT_MS", "15000"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(settings.bind_addr.port(), 8080);
        assert_eq!(settings.max_connections, 12);
        assert_eq!(settings.statement_timeout_ms, Some(15000));
        assert_eq!(settings.cors_allowed_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = settings_from(&[("DATABASE_URL", "postgres://db"), ("DB_MAX_CONNECTIONS", "many")])
            .unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
