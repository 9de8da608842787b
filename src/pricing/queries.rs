//! Database queries for the pricing rule table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::PricingRule;

const RULE_COLUMNS: &str = r#"
    id, name, start_date, end_date, days, start_time, end_time,
    adult_cents, child_cents, currency, priority, created_at, updated_at
"#;

/// Column values for an insert or a full replacement
#[derive(Debug, Clone)]
pub struct RuleValues {
    pub name: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub days: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adult_cents: i64,
    pub child_cents: i64,
    pub currency: String,
    pub priority: i32,
}

/// List all rules in evaluation order.
///
/// Higher priority first; ties go to the earliest-created rule, then id.
pub async fn list_rules(pool: &PgPool) -> Result<Vec<PricingRule>, AppError> {
    let rules = sqlx::query_as::<_, PricingRule>(&format!(
        r#"
        SELECT {RULE_COLUMNS}
        FROM pricing_rules
        ORDER BY priority DESC, created_at ASC, id ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// Insert a new rule
pub async fn insert_rule(pool: &PgPool, values: &RuleValues) -> Result<PricingRule, AppError> {
    let rule = sqlx::query_as::<_, PricingRule>(&format!(
        r#"
        INSERT INTO pricing_rules (
            id, name, start_date, end_date, days, start_time, end_time,
            adult_cents, child_cents, currency, priority
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&values.name)
    .bind(values.start_date)
    .bind(values.end_date)
    .bind(&values.days)
    .bind(&values.start_time)
    .bind(&values.end_time)
    .bind(values.adult_cents)
    .bind(values.child_cents)
    .bind(&values.currency)
    .bind(values.priority)
    .fetch_one(pool)
    .await?;

    Ok(rule)
}

/// Replace every column of an existing rule
pub async fn update_rule(
    pool: &PgPool,
    id: Uuid,
    values: &RuleValues,
) -> Result<Option<PricingRule>, AppError> {
    let rule = sqlx::query_as::<_, PricingRule>(&format!(
        r#"
        UPDATE pricing_rules
        SET name = $2,
            start_date = $3,
            end_date = $4,
            days = $5,
            start_time = $6,
            end_time = $7,
            adult_cents = $8,
            child_cents = $9,
            currency = $10,
            priority = $11,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&values.name)
    .bind(values.start_date)
    .bind(values.end_date)
    .bind(&values.days)
    .bind(&values.start_time)
    .bind(&values.end_time)
    .bind(values.adult_cents)
    .bind(values.child_cents)
    .bind(&values.currency)
    .bind(values.priority)
    .fetch_optional(pool)
    .await?;

    Ok(rule)
}

/// Delete a rule, returning whether a row was removed
pub async fn delete_rule(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
