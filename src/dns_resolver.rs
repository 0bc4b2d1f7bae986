use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::error::{LookupError, ScanError};
use crate::model::{RecordType, ResolutionRecord, ResolveOutcome};

/// Google公共DoH的JSON接口
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

/// 单类型DNS查询。
///
/// `Err` 表示“无结果”（上游不可用或返回失败状态），
/// `Ok(vec![])` 表示上游正常应答但没有记录，两者不能混淆。
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<ResolutionRecord>, LookupError>;
}

/// 基于DNS-over-HTTPS JSON接口的查询客户端
#[derive(Clone)]
pub struct DohClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl DohClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ScanError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint, timeout))
    }

    /// 复用已有的HTTP客户端
    pub fn with_client(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        DohClient {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DnsLookup for DohClient {
    async fn lookup(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<ResolutionRecord>, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", host), ("type", record_type.as_str())])
            .header("accept", "application/dns-json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;
        parse_doh_response(&body)
    }
}

/// 解析DoH JSON应答：`Status` 非0视为失败，缺少 `Answer` 视为空应答
pub fn parse_doh_response(body: &Value) -> Result<Vec<ResolutionRecord>, LookupError> {
    let status = body
        .get("Status")
        .and_then(Value::as_i64)
        .ok_or_else(|| LookupError::Malformed("缺少Status字段".to_string()))?;
    if status != 0 {
        return Err(LookupError::Rcode(status));
    }

    match body.get("Answer") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(|item| serde_json::from_value::<ResolutionRecord>(item.clone()).ok())
            .collect()),
        Some(_) => Err(LookupError::Malformed("Answer不是数组".to_string())),
    }
}

/// DNS解析器：存在性检测与完整记录收集
#[derive(Clone)]
pub struct DnsResolver {
    lookup: Arc<dyn DnsLookup>,
}

impl DnsResolver {
    pub fn new(lookup: Arc<dyn DnsLookup>) -> Self {
        DnsResolver { lookup }
    }

    /// 使用DoH端点创建解析器
    pub fn doh(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ScanError> {
        Ok(DnsResolver::new(Arc::new(DohClient::new(endpoint, timeout)?)))
    }

    /// 依次尝试 A、AAAA、CNAME，第一个有应答的类型即证明存在
    pub async fn resolve_exists(&self, host: &str) -> ResolveOutcome {
        for record_type in RecordType::EXISTENCE_ORDER {
            match self.lookup.lookup(host, record_type).await {
                Ok(answers) if !answers.is_empty() => {
                    return ResolveOutcome {
                        exists: true,
                        answers,
                    };
                }
                Ok(_) => {}
                Err(e) => debug!("{} {} 查询无结果: {}", host, record_type, e),
            }
        }

        ResolveOutcome::default()
    }

    /// 查询 A、AAAA、CNAME、TXT 全部类型并按顺序拼接，不短路
    pub async fn resolve_all(&self, host: &str) -> Vec<ResolutionRecord> {
        let mut records = Vec::new();

        for record_type in RecordType::ENRICH_ORDER {
            match self.lookup.lookup(host, record_type).await {
                Ok(answers) => records.extend(answers),
                Err(e) => debug!("{} {} 查询无结果: {}", host, record_type, e),
            }
        }

        records
    }
}
