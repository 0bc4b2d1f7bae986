use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::error::SourceError;
use crate::sanitize::sanitize;

pub const DEFAULT_CRTSH_URL: &str = "https://crt.sh";
pub const DEFAULT_THREATCROWD_URL: &str = "https://www.threatcrowd.org";

/// 被动数据源。
///
/// `fetch_raw` 保留失败原因，`fetch` 把任何失败折叠成空列表并清洗结果，
/// 数据源不可靠，扫描需要在降级状态下继续。
#[async_trait]
pub trait PassiveSource: Send + Sync {
    /// 日志中使用的数据源名称
    fn name(&self) -> &'static str;

    /// 拉取原始名字列表
    async fn fetch_raw(&self, domain: &str) -> Result<Vec<String>, SourceError>;

    /// 拉取并清洗候选子域名，失败时返回空列表
    async fn fetch(&self, domain: &str) -> Vec<String> {
        match self.fetch_raw(domain).await {
            Ok(raw) => {
                let candidates: Vec<String> = sanitize(&raw, domain).into_iter().collect();
                debug!("{} 返回 {} 条记录，清洗后 {} 个候选", self.name(), raw.len(), candidates.len());
                candidates
            }
            Err(e) => {
                warn!("数据源 {} 不可用: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

async fn get_json(request: reqwest::RequestBuilder) -> Result<Value, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| SourceError::Malformed(e.to_string()))
}

/// crt.sh证书透明度查询
#[derive(Clone)]
pub struct CrtShSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CrtShSource {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        CrtShSource {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PassiveSource for CrtShSource {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn fetch_raw(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let query = format!("%.{}", domain);
        let request = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("output", "json")])
            .header("accept", "application/json")
            .timeout(self.timeout);

        extract_crtsh_names(&get_json(request).await?)
    }
}

/// 证书记录数组，每条取 `name_value`，没有时取 `common_name`
pub fn extract_crtsh_names(body: &Value) -> Result<Vec<String>, SourceError> {
    let rows = body
        .as_array()
        .ok_or_else(|| SourceError::Malformed("crt.sh响应不是数组".to_string()))?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            row.get("name_value")
                .and_then(Value::as_str)
                .or_else(|| row.get("common_name").and_then(Value::as_str))
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

/// ThreatCrowd威胁情报查询
#[derive(Clone)]
pub struct ThreatCrowdSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ThreatCrowdSource {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        ThreatCrowdSource {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PassiveSource for ThreatCrowdSource {
    fn name(&self) -> &'static str {
        "threatcrowd"
    }

    async fn fetch_raw(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/searchApi/v2/domain/report/",
            self.base_url.trim_end_matches('/')
        );
        let request = self
            .client
            .get(&url)
            .query(&[("domain", domain)])
            .timeout(self.timeout);

        extract_threatcrowd_names(&get_json(request).await?)
    }
}

/// 报告对象中的 `subdomains` 字符串数组
pub fn extract_threatcrowd_names(body: &Value) -> Result<Vec<String>, SourceError> {
    let subdomains = body
        .get("subdomains")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Malformed("缺少subdomains数组".to_string()))?;

    Ok(subdomains
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}
