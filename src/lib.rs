//! # subrecon
//!
//! 子域名收集与验证库：从证书透明度和威胁情报数据源被动收集候选，
//! 结合字典暴破生成候选，再通过DNS-over-HTTPS有界并发地验证。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use subrecon::{scan, ScanOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = scan("example.com", ScanOptions::default()).await?;
//!
//!     println!("{}/{} 个子域名存在", report.found.len(), report.total_candidates);
//!     for result in report.found.iter().take(5) {
//!         println!("  {} ({} 条记录)", result.host, result.records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 自定义配置
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use subrecon::{ScanConfig, ScanEngine, ScanOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig {
//!         dns_timeout: Duration::from_secs(2),
//!         wordlist: vec!["www".to_string(), "api".to_string()],
//!         ..Default::default()
//!     };
//!
//!     let engine = ScanEngine::new(config)?;
//!     let options = ScanOptions { concurrency: 50, ..Default::default() };
//!     let report = engine.scan("example.com", &options).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod dns_resolver;
pub mod error;
pub mod executor;
pub mod gen;
pub mod input;
pub mod logger;
pub mod model;
pub mod output;
pub mod sanitize;
pub mod sources;
pub mod subdata;
pub mod summary;

// 重新导出主要的公共API
pub use api::{scan, ScanConfig, ScanEngine, ScanOptions};

pub use dns_resolver::{DnsLookup, DnsResolver, DohClient};
pub use error::{LookupError, ScanError, SourceError};
pub use model::{RecordType, ResolutionRecord, ResolveOutcome, ScanReport, SubdomainResult};
pub use sanitize::{is_likely_subdomain, normalize_domain, sanitize};
pub use sources::{CrtShSource, PassiveSource, ThreatCrowdSource};
pub use gen::{generate_candidates, load_wordlist};
pub use output::export_report;
pub use input::OutputFormat;
pub use summary::{generate_summary, SummaryStats};
