use std::collections::BTreeSet;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info};
use reqwest::Client;

use crate::dns_resolver::{DnsResolver, DEFAULT_DOH_ENDPOINT};
use crate::error::ScanError;
use crate::executor;
use crate::gen::generate_candidates;
use crate::model::{ScanReport, SubdomainResult};
use crate::sanitize::normalize_domain;
use crate::sources::{
    CrtShSource, PassiveSource, ThreatCrowdSource, DEFAULT_CRTSH_URL, DEFAULT_THREATCROWD_URL,
};
use crate::subdata;

/// 单次扫描的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// 是否进行DNS验证，关闭时所有候选标记为 `exists=false`
    pub dns_validate: bool,
    /// 是否加入字典暴破候选
    pub brute_force: bool,
    /// DNS验证的并发上限，小于1时按1处理
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            dns_validate: true,
            brute_force: true,
            concurrency: 20,
        }
    }
}

/// 扫描引擎配置
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// DoH JSON接口地址
    pub doh_endpoint: String,
    /// crt.sh 基础地址
    pub crtsh_url: String,
    /// ThreatCrowd 基础地址
    pub threatcrowd_url: String,
    /// 单次DNS查询超时
    pub dns_timeout: Duration,
    /// 单个被动数据源请求超时
    pub source_timeout: Duration,
    /// 暴破字典
    pub wordlist: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            crtsh_url: DEFAULT_CRTSH_URL.to_string(),
            threatcrowd_url: DEFAULT_THREATCROWD_URL.to_string(),
            dns_timeout: Duration::from_secs(4),
            source_timeout: Duration::from_secs(8),
            wordlist: subdata::default_wordlist(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.doh_endpoint.trim().is_empty() {
            return Err(ScanError::InvalidConfig("DoH地址为空".to_string()));
        }
        if self.dns_timeout.is_zero() || self.source_timeout.is_zero() {
            return Err(ScanError::InvalidConfig("超时时间必须大于0".to_string()));
        }
        Ok(())
    }
}

/// 子域名扫描引擎：被动收集 + 字典暴破 + DoH验证
pub struct ScanEngine {
    config: ScanConfig,
    resolver: DnsResolver,
    sources: Vec<Arc<dyn PassiveSource>>,
}

impl ScanEngine {
    /// 按配置创建引擎，使用 crt.sh、ThreatCrowd 和 DoH 解析
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;

        let resolver = DnsResolver::doh(config.doh_endpoint.clone(), config.dns_timeout)?;
        let client = Client::builder().timeout(config.source_timeout).build()?;
        let sources: Vec<Arc<dyn PassiveSource>> = vec![
            Arc::new(CrtShSource::new(
                client.clone(),
                config.crtsh_url.clone(),
                config.source_timeout,
            )),
            Arc::new(ThreatCrowdSource::new(
                client,
                config.threatcrowd_url.clone(),
                config.source_timeout,
            )),
        ];

        Ok(Self::with_components(config, resolver, sources))
    }

    /// 注入自定义解析器和数据源
    pub fn with_components(
        config: ScanConfig,
        resolver: DnsResolver,
        sources: Vec<Arc<dyn PassiveSource>>,
    ) -> Self {
        ScanEngine {
            config,
            resolver,
            sources,
        }
    }

    /// 执行一次扫描。
    ///
    /// 只有目标域名为空时返回错误，数据源或DNS失败都只会让结果变少。
    pub async fn scan(&self, domain_input: &str, options: &ScanOptions) -> Result<ScanReport, ScanError> {
        let domain = normalize_domain(domain_input)?;
        let started_at = Utc::now();
        info!("开始扫描: {}", domain);

        let mut candidates = self.gather_passive(&domain).await;
        info!("被动数据源候选数量: {}", candidates.len());

        if options.brute_force {
            candidates.extend(generate_candidates(&domain, &self.config.wordlist));
        }
        let total_candidates = candidates.len();
        let candidates: Vec<String> = candidates.into_iter().collect();
        info!("候选子域名总数: {}", total_candidates);

        if !options.dns_validate {
            // 未验证的候选同样标记为 exists=false
            let found = candidates.into_iter().map(SubdomainResult::absent).collect();
            return Ok(ScanReport {
                domain,
                total_candidates,
                found,
                started_at,
                finished_at: Utc::now(),
            });
        }

        let found: Vec<SubdomainResult> = self
            .validate(candidates, options.concurrency)
            .await
            .into_iter()
            .flatten()
            .filter(|result| result.exists)
            .collect();
        info!("验证完成: {}/{} 个子域名存在", found.len(), total_candidates);

        Ok(ScanReport {
            domain,
            total_candidates,
            found,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// 并行查询所有被动数据源，失败的数据源贡献空集合
    async fn gather_passive(&self, domain: &str) -> BTreeSet<String> {
        let domain = domain.to_string();
        let fan_out = self.sources.len();

        executor::run(self.sources.clone(), fan_out, move |source| {
            let domain = domain.clone();
            async move { Ok::<_, Infallible>(source.fetch(&domain).await) }
        })
        .await
        .into_iter()
        .flatten()
        .flatten()
        .collect()
    }

    async fn validate(&self, candidates: Vec<String>, concurrency: usize) -> Vec<Option<SubdomainResult>> {
        let resolver = self.resolver.clone();

        executor::run(candidates, concurrency.max(1), move |host| {
            let resolver = resolver.clone();
            async move { Ok::<_, Infallible>(validate_candidate(&resolver, host).await) }
        })
        .await
    }
}

/// 单个候选的验证：先确认存在，再收集全部记录
async fn validate_candidate(resolver: &DnsResolver, host: String) -> SubdomainResult {
    let outcome = resolver.resolve_exists(&host).await;
    if !outcome.exists {
        return SubdomainResult::absent(host);
    }

    // 第二轮查询全部失败时记录为空，但子域名仍视为存在
    let records = resolver.resolve_all(&host).await;
    debug!("发现子域名: {} ({} 条记录)", host, records.len());
    SubdomainResult::present(host, records)
}

/// 便捷扫描函数，使用默认配置
pub async fn scan(domain: &str, options: ScanOptions) -> Result<ScanReport, ScanError> {
    let engine = ScanEngine::new(ScanConfig::default())?;
    engine.scan(domain, &options).await
}
