use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::Record;

use crate::store::{ListQuery, RecordStore};

/// Largest page the list endpoint will return.
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<Record>,
    offset: Option<String>,
}

pub struct AirtableClient {
    client: Client,
    api_url: String,
    base_id: String,
    api_key: String,
}

impl AirtableClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.airtable_timeout())
            .build()
            .context("failed to build Airtable HTTP client")?;

        Ok(Self {
            client,
            api_url: config.airtable_api_url.trim_end_matches('/').to_string(),
            base_id: config.airtable_base_id.clone(),
            api_key: config.airtable_api_key.clone(),
        })
    }

    /// `{api_url}/{base_id}/{table}[/{record_id}]`, each segment percent-encoded.
    fn table_url(&self, table: &str, record_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("invalid Airtable API URL: {}", self.api_url))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Airtable API URL cannot be a base: {}", self.api_url))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(&self.api_key)
    }

    async fn send<T>(&self, req: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Airtable API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                422 => anyhow!("Invalid request: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    fn page_params(query: &ListQuery, offset: Option<&str>, remaining: Option<usize>) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(formula) = &query.formula {
            params.push(("filterByFormula".to_string(), formula.to_string()));
        }

        for (i, (field, direction)) in query.sort.iter().enumerate() {
            params.push((format!("sort[{}][field]", i), field.clone()));
            params.push((format!("sort[{}][direction]", i), direction.as_str().to_string()));
        }

        if let Some(max) = query.max_records {
            params.push(("maxRecords".to_string(), max.to_string()));
        }

        let page_size = remaining.map_or(MAX_PAGE_SIZE, |r| r.min(MAX_PAGE_SIZE));
        params.push(("pageSize".to_string(), page_size.to_string()));

        if let Some(offset) = offset {
            params.push(("offset".to_string(), offset.to_string()));
        }

        params
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list(&self, table: &str, query: ListQuery) -> Result<Vec<Record>> {
        let url = self.table_url(table, None)?;
        debug!("Listing records from {} with {:?}", table, query.formula);

        if query.max_records == Some(0) {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let remaining = query.max_records.map(|max| max - records.len());
            let params = Self::page_params(&query, offset.as_deref(), remaining);

            let page: RecordPage = self
                .send(self.request(Method::GET, url.clone()).query(&params))
                .await?;

            records.extend(page.records);

            if let Some(max) = query.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    break;
                }
            }

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!("Fetched {} records from {}", records.len(), table);
        Ok(records)
    }

    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<Record> {
        let url = self.table_url(table, None)?;
        debug!("Creating record in {}", table);

        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "fields": fields })),
        )
        .await
    }

    async fn update(&self, table: &str, record_id: &str, fields: Map<String, Value>) -> Result<Record> {
        let url = self.table_url(table, Some(record_id))?;
        debug!("Updating record {} in {}", record_id, table);

        self.send(
            self.request(Method::PATCH, url)
                .json(&json!({ "fields": fields })),
        )
        .await
    }

    async fn delete(&self, table: &str, record_id: &str) -> Result<()> {
        let url = self.table_url(table, Some(record_id))?;
        debug!("Deleting record {} from {}", record_id, table);

        let _: Value = self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
