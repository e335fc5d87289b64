use crate::api_client::{ApiClient, InsightsApi};
use crate::config::Config;
use crate::error::Error;
use crate::output;
use crate::pipeline::{age_gender_insights, Pipeline};
use crate::validate::validate_rows;
use chrono::NaiveDate;
use log::info;
use serde_json::{Map, Value};

/// Fetches insight rows for the account over the date range and validates
/// every row against the pipeline's schema.
pub async fn pipeline_service<A: InsightsApi>(
    api: &A,
    account_id: &str,
    start: &NaiveDate,
    end: &NaiveDate,
    pipeline: &Pipeline,
) -> Result<Vec<Map<String, Value>>, Error> {
    if start > end {
        return Err(Error::StartDateAfterEndDate {
            start_date: start.to_string(),
            end_date: end.to_string(),
        });
    }

    let rows = api
        .fetch_insights(account_id, &pipeline.insights_options, start, end)
        .await?;

    validate_rows(rows, pipeline)
}

pub async fn fetch_and_validate_insights(
    config: Config,
    account_id: &str,
    start: &NaiveDate,
    end: &NaiveDate,
) -> Result<(), Error> {
    let api_client = ApiClient::new(&config);
    let pipeline = age_gender_insights();

    let rows = pipeline_service(&api_client, account_id, start, end, &pipeline).await?;

    info!(
        "validated {} insight rows for account {}",
        rows.len(),
        account_id
    );

    output::write_rows_and_schema(&pipeline, account_id, &rows, &config.output_dir)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::MockInsightsApi;
    use serde_json::json;
    use std::str::FromStr;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[tokio::test]
    async fn test_pipeline_service_validates_fetched_rows() {
        let mut api = MockInsightsApi::new();
        api.expect_fetch_insights().returning(|_, _, _, _| {
            Ok(vec![as_map(json!({
                "date_start": "2022-01-01T00:00:00+0000",
                "date_stop": "2022-12-01",
                "age": "25-34",
                "gender": "female",
                "account_id": "366740567397582",
                "impressions": "1000",
                "spend": "12.5",
                "actions": [{ "action_type": "link_click", "value": "17" }],
            }))])
        });

        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-01-01").unwrap();
        let end = NaiveDate::from_str("2022-12-01").unwrap();

        let rows = pipeline_service(&api, "366740567397582", &start, &end, &pipeline)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["date_start"], json!("2022-01-01"));
        assert_eq!(rows[0]["account_id"].as_i64(), Some(366740567397582));
        assert_eq!(rows[0]["impressions"], json!(1000));
        assert_eq!(
            rows[0]["actions"],
            json!([{ "action_type": "link_click", "value": 17 }])
        );
    }

    #[tokio::test]
    async fn test_pipeline_service_rejects_invalid_row() {
        let mut api = MockInsightsApi::new();
        api.expect_fetch_insights()
            .returning(|_, _, _, _| Ok(vec![as_map(json!({ "unknown_metric": 1 }))]));

        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-01-01").unwrap();
        let end = NaiveDate::from_str("2022-12-01").unwrap();

        let result = pipeline_service(&api, "123", &start, &end, &pipeline).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UnknownField { field } if field == "unknown_metric"
        ));
    }

    #[tokio::test]
    async fn test_pipeline_service_start_after_end() {
        let api = MockInsightsApi::new();

        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-12-01").unwrap();
        let end = NaiveDate::from_str("2022-01-01").unwrap();

        let result = pipeline_service(&api, "123", &start, &end, &pipeline).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StartDateAfterEndDate { .. }
        ));
    }

    #[tokio::test]
    async fn test_pipeline_service_propagates_api_error() {
        let mut api = MockInsightsApi::new();
        api.expect_fetch_insights().returning(|_, _, _, _| {
            Err(Error::NoData {
                message: "No insight rows returned for account 123".to_string(),
            })
        });

        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-01-01").unwrap();
        let end = NaiveDate::from_str("2022-12-01").unwrap();

        let result = pipeline_service(&api, "123", &start, &end, &pipeline).await;
        assert!(matches!(result.unwrap_err(), Error::NoData { .. }));
    }
}
