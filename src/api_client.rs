use crate::config::Config;
use crate::error::Error;
use crate::pipeline::InsightsOptions;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

const GRAPH_API_VERSION: &str = "v19.0";

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InsightsApi: Send + Sync + 'static {
    /// Fetches insight rows for the account within the given date range.
    /// # Arguments
    /// * `account_id` - The ad account to fetch insights for.
    /// * `options` - The request configuration (level, fields, breakdowns).
    /// * `start` - The start date for the report range.
    /// * `end` - The end date for the report range.
    /// # Returns
    /// A Result containing either the raw insight rows as JSON objects,
    /// ready for validation, or an Error.
    async fn fetch_insights(
        &self,
        account_id: &str,
        options: &InsightsOptions,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<Vec<Map<String, Value>>, Error>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct InsightsResponse {
    data: Vec<Map<String, Value>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: config.api_url.to_string(),
            access_token: config.access_token.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl InsightsApi for ApiClient {
    async fn fetch_insights(
        &self,
        account_id: &str,
        options: &InsightsOptions,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<Vec<Map<String, Value>>, Error> {
        // Construct the URL safely
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::UrlParsingFailed(url::ParseError::SetHostOnCannotBeABaseUrl))?
            .extend(&[GRAPH_API_VERSION, &format!("act_{account_id}"), "insights"]);

        let time_range = format!(
            r#"{{"since":"{}","until":"{}"}}"#,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        url.query_pairs_mut()
            .append_pair("level", options.level)
            .append_pair("fields", &options.fields.join(","))
            .append_pair("breakdowns", options.breakdowns)
            .append_pair("time_range", &time_range)
            .append_pair("access_token", &self.access_token);

        let resp = self.client.get(url).send().await?.error_for_status()?;

        let response = resp.json::<InsightsResponse>().await?;

        if response.data.is_empty() {
            return Err(Error::NoData {
                message: format!("No insight rows returned for account {account_id}"),
            });
        }

        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::age_gender_insights;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_fetch_insights_invalid_url() {
        let config = Config {
            api_url: String::from("invalid_url"),
            access_token: String::from("test_token"),
            output_dir: String::from("/path/to/output"),
        };
        let client = ApiClient::new(&config);
        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-01-01").unwrap();
        let end = NaiveDate::from_str("2022-12-01").unwrap();

        let result = client
            .fetch_insights("366740567397582", &pipeline.insights_options, &start, &end)
            .await;
        assert!(matches!(result.unwrap_err(), Error::UrlParsingFailed(_)));
    }

    #[tokio::test]
    async fn test_fetch_insights_non_base_url() {
        let config = Config {
            api_url: String::from("mailto:ads@example.com"),
            access_token: String::from("test_token"),
            output_dir: String::from("/path/to/output"),
        };
        let client = ApiClient::new(&config);
        let pipeline = age_gender_insights();
        let start = NaiveDate::from_str("2022-01-01").unwrap();
        let end = NaiveDate::from_str("2022-12-01").unwrap();

        let result = client
            .fetch_insights("366740567397582", &pipeline.insights_options, &start, &end)
            .await;
        assert!(matches!(result.unwrap_err(), Error::UrlParsingFailed(_)));
    }
}
