pub mod accounts;
pub mod transactions;
pub mod users;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::AppState;

/// Deserializes monetary amounts from request bodies. String values are
/// parsed exactly and keep the strict two-digit scale check downstream.
/// JSON numbers arrive through an f64 and carry its binary fuzz (10.10
/// becomes 10.0999...), so they are snapped back to cents before anything
/// validates their scale.
pub mod amount {
    use std::fmt;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde::de::{self, Deserializer, Visitor};

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = BigDecimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigDecimal, E> {
            BigDecimal::from_str(v.trim()).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigDecimal, E> {
            if !v.is_finite() {
                return Err(E::custom("amount must be a finite number"));
            }

            BigDecimal::from_str(&format!("{:.2}", v)).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct OptionalAmountVisitor;

    impl<'de> Visitor<'de> for OptionalAmountVisitor {
        type Value = Option<BigDecimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as a string or number, or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            deserialize(d).map(Some)
        }
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionalAmountVisitor)
    }
}

#[derive(Debug, Serialize)]
pub struct DbPoolStats {
    pub active_connections: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db: String,
    pub db_pool: DbPoolStats,
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let pool = &state.db;
    let pool_stats = DbPoolStats {
        active_connections: pool.size(),
        idle_connections: pool.num_idle() as u32,
        max_connections: pool.options().get_max_connections(),
    };

    let health_response = HealthStatus {
        status: if db_status == "connected" {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        db: db_status.to_string(),
        db_pool: pool_stats,
    };

    let status_code = if db_status == "connected" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_response))
}
