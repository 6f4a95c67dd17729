use std::collections::HashMap;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use tracing::info;

use crate::error::WalmetricsResult;
use crate::metrics::{FieldDescriptor, FieldType, MetricRecord, MetricsExtractor};
use crate::types::Value;

/// The analytical query deriving common metrics from the loaded change data.
///
/// Joins the event stream with its transaction, transaction request and
/// payment instrument token tables, pulling the decline details, payment
/// method and customer id out of their JSON columns.
const COMMON_METRICS_QUERY: &str = r#"
    select
        "event_v2_data".event_id,
        "event_v2_data".flow_id,
        "event_v2_data".created_at,
        "event_v2_data".transaction_lifecycle_event,
        json_extract("event_v2_data"."error_details", '$.decline_reason') as decline_reason,
        json_extract("event_v2_data"."error_details", '$.decline_type') as decline_type,
        json_extract("transaction_request"."vault_options", '$.payment_method') as payment_method,
        "transaction".transaction_id,
        "transaction".transaction_type,
        "transaction".amount,
        "transaction".currency_code,
        "transaction".processor_merchant_account_id,
        "payment_instrument_token_data".three_d_secure_authentication,
        "payment_instrument_token_data".payment_instrument_type,
        json_extract("payment_instrument_token_data"."vault_data", '$.customer_id') as customer_id
    from
        "event_v2_data"
    inner join "transaction"
        on "event_v2_data"."transaction_id" = "transaction"."transaction_id"
    inner join "transaction_request"
        on "event_v2_data"."flow_id" = "transaction_request"."flow_id"
    inner join "payment_instrument_token_data"
        on "payment_instrument_token_data"."token_id" = "transaction_request"."token_id"
"#;

/// Shape of the common-metric output table, in column order.
const COMMON_METRIC_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor { name: "event_id", typ: FieldType::Text },
    FieldDescriptor { name: "flow_id", typ: FieldType::Text },
    FieldDescriptor { name: "created_at", typ: FieldType::Timestamp },
    FieldDescriptor { name: "transaction_lifecycle_event", typ: FieldType::Text },
    FieldDescriptor { name: "decline_reason", typ: FieldType::Text },
    FieldDescriptor { name: "decline_type", typ: FieldType::Text },
    FieldDescriptor { name: "payment_method", typ: FieldType::Text },
    FieldDescriptor { name: "transaction_id", typ: FieldType::Text },
    FieldDescriptor { name: "transaction_type", typ: FieldType::Text },
    FieldDescriptor { name: "amount", typ: FieldType::Real },
    FieldDescriptor { name: "currency_code", typ: FieldType::Text },
    FieldDescriptor { name: "processor_merchant_account_id", typ: FieldType::Text },
    FieldDescriptor { name: "three_d_secure_authentication", typ: FieldType::Text },
    FieldDescriptor { name: "payment_instrument_type", typ: FieldType::Text },
    FieldDescriptor { name: "customer_id", typ: FieldType::Text },
];

/// One derived metric row, to be appended to the output database.
///
/// Timestamps and ids stay as the text the change capture carried; the only
/// numeric field is the transaction amount. Fields produced by `json_extract`
/// or nullable source columns are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonMetric {
    pub event_id: String,
    pub flow_id: String,
    pub created_at: String,
    pub transaction_lifecycle_event: String,
    pub decline_reason: Option<String>,
    pub decline_type: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: String,
    pub transaction_type: String,
    pub amount: f64,
    pub currency_code: String,
    pub processor_merchant_account_id: String,
    pub three_d_secure_authentication: Option<String>,
    pub payment_instrument_type: String,
    pub customer_id: Option<String>,
}

impl MetricRecord for CommonMetric {
    fn record_name() -> &'static str {
        "CommonMetric"
    }

    fn fields() -> &'static [FieldDescriptor] {
        COMMON_METRIC_FIELDS
    }

    fn row(&self) -> HashMap<String, Value> {
        HashMap::from([
            ("event_id".to_string(), Value::Text(self.event_id.clone())),
            ("flow_id".to_string(), Value::Text(self.flow_id.clone())),
            ("created_at".to_string(), Value::Text(self.created_at.clone())),
            (
                "transaction_lifecycle_event".to_string(),
                Value::Text(self.transaction_lifecycle_event.clone()),
            ),
            ("decline_reason".to_string(), opt_text(&self.decline_reason)),
            ("decline_type".to_string(), opt_text(&self.decline_type)),
            ("payment_method".to_string(), opt_text(&self.payment_method)),
            (
                "transaction_id".to_string(),
                Value::Text(self.transaction_id.clone()),
            ),
            (
                "transaction_type".to_string(),
                Value::Text(self.transaction_type.clone()),
            ),
            ("amount".to_string(), Value::Real(self.amount)),
            (
                "currency_code".to_string(),
                Value::Text(self.currency_code.clone()),
            ),
            (
                "processor_merchant_account_id".to_string(),
                Value::Text(self.processor_merchant_account_id.clone()),
            ),
            (
                "three_d_secure_authentication".to_string(),
                opt_text(&self.three_d_secure_authentication),
            ),
            (
                "payment_instrument_type".to_string(),
                Value::Text(self.payment_instrument_type.clone()),
            ),
            ("customer_id".to_string(), opt_text(&self.customer_id)),
        ])
    }
}

fn opt_text(value: &Option<String>) -> Value {
    match value {
        Some(value) => Value::Text(value.clone()),
        None => Value::Null,
    }
}

/// The shipped extractor: runs the common-metrics join query and maps each
/// result row into a [`CommonMetric`] by column name.
#[derive(Debug, Clone, Default)]
pub struct CommonMetricsExtractor;

impl CommonMetricsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsExtractor for CommonMetricsExtractor {
    type Record = CommonMetric;

    async fn extract(&self, conn: &mut SqliteConnection) -> WalmetricsResult<Vec<CommonMetric>> {
        info!("extracting common metrics");

        let rows = sqlx::query(COMMON_METRICS_QUERY)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter().map(row_to_metric).collect()
    }
}

/// Maps one result row into a [`CommonMetric`] by column name.
fn row_to_metric(row: &SqliteRow) -> WalmetricsResult<CommonMetric> {
    Ok(CommonMetric {
        event_id: row.try_get("event_id")?,
        flow_id: row.try_get("flow_id")?,
        created_at: row.try_get("created_at")?,
        transaction_lifecycle_event: row.try_get("transaction_lifecycle_event")?,
        decline_reason: row.try_get("decline_reason")?,
        decline_type: row.try_get("decline_type")?,
        payment_method: row.try_get("payment_method")?,
        transaction_id: row.try_get("transaction_id")?,
        transaction_type: row.try_get("transaction_type")?,
        amount: row.try_get("amount")?,
        currency_code: row.try_get("currency_code")?,
        processor_merchant_account_id: row.try_get("processor_merchant_account_id")?,
        three_d_secure_authentication: row.try_get("three_d_secure_authentication")?,
        payment_instrument_type: row.try_get("payment_instrument_type")?,
        customer_id: row.try_get("customer_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValues;

    fn create_test_metric() -> CommonMetric {
        CommonMetric {
            event_id: "ev-1".to_string(),
            flow_id: "fl-1".to_string(),
            created_at: "2021-02-10 15:00:00".to_string(),
            transaction_lifecycle_event: "AUTHORIZED".to_string(),
            decline_reason: None,
            decline_type: None,
            payment_method: Some("PAYMENT_CARD".to_string()),
            transaction_id: "tr-1".to_string(),
            transaction_type: "SALE".to_string(),
            amount: 129.9,
            currency_code: "EUR".to_string(),
            processor_merchant_account_id: "pm-1".to_string(),
            three_d_secure_authentication: Some("AUTH_SUCCESS".to_string()),
            payment_instrument_type: "PAYMENT_CARD".to_string(),
            customer_id: Some("cu-1".to_string()),
        }
    }

    #[test]
    fn row_projection_covers_every_declared_field() {
        let metric = create_test_metric();
        let row = metric.row();

        for field in CommonMetric::fields() {
            assert!(
                row.value_for(field.name).is_some(),
                "missing projection for field {}",
                field.name
            );
        }
        assert_eq!(row.len(), CommonMetric::fields().len());
    }

    #[test]
    fn optional_fields_project_to_null() {
        let metric = create_test_metric();
        let row = metric.row();

        assert_eq!(row.value_for("decline_reason"), Some(&Value::Null));
        assert_eq!(
            row.value_for("payment_method"),
            Some(&Value::Text("PAYMENT_CARD".to_string()))
        );
        assert_eq!(row.value_for("amount"), Some(&Value::Real(129.9)));
    }
}
