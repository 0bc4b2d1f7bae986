use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DNS记录类型（只包含扫描会用到的类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    TXT,
}

impl RecordType {
    /// 存在性检测的回退顺序
    pub const EXISTENCE_ORDER: [RecordType; 3] = [RecordType::A, RecordType::AAAA, RecordType::CNAME];

    /// 完整记录收集的查询顺序
    pub const ENRICH_ORDER: [RecordType; 4] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::CNAME,
        RecordType::TXT,
    ];

    /// DoH查询参数使用的助记符
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::TXT => "TXT",
        }
    }

    /// 线上格式的数字类型码
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::CNAME => 5,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
        }
    }

    pub fn from_code(code: u16) -> Option<RecordType> {
        match code {
            1 => Some(RecordType::A),
            5 => Some(RecordType::CNAME),
            16 => Some(RecordType::TXT),
            28 => Some(RecordType::AAAA),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一条DNS应答，字段名与DoH JSON的 `Answer` 元素一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub data: String,
}

impl ResolutionRecord {
    /// 记录类型的可读名称，未知类型返回数字
    pub fn type_name(&self) -> String {
        match RecordType::from_code(self.record_type) {
            Some(t) => t.to_string(),
            None => self.record_type.to_string(),
        }
    }
}

/// 单个候选子域名的验证结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainResult {
    pub host: String,
    pub exists: bool,
    pub records: Vec<ResolutionRecord>,
}

impl SubdomainResult {
    /// 未验证或不存在的候选，记录为空
    pub fn absent(host: impl Into<String>) -> Self {
        SubdomainResult {
            host: host.into(),
            exists: false,
            records: Vec::new(),
        }
    }

    pub fn present(host: impl Into<String>, records: Vec<ResolutionRecord>) -> Self {
        SubdomainResult {
            host: host.into(),
            exists: true,
            records,
        }
    }
}

/// 扫描报告，唯一对外输出的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub domain: String,
    /// 验证过滤之前的候选数量
    pub total_candidates: usize,
    pub found: Vec<SubdomainResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    /// 确认存在的子域名数量，跳过验证时为0
    pub fn found_hosts(&self) -> usize {
        self.found.iter().filter(|r| r.exists).count()
    }

    /// 发现率：确认存在的子域名 / totalCandidates
    pub fn discovery_rate(&self) -> f64 {
        if self.total_candidates == 0 {
            return 0.0;
        }
        self.found_hosts() as f64 / self.total_candidates as f64
    }
}

/// 存在性检测的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub exists: bool,
    pub answers: Vec<ResolutionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_doh_answer() {
        let json = r#"{"name":"www.example.com.","type":1,"TTL":300,"data":"93.184.216.34"}"#;
        let record: ResolutionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_type, 1);
        assert_eq!(record.ttl, Some(300));
        assert_eq!(record.type_name(), "A");
    }

    #[test]
    fn record_without_ttl_omits_field() {
        let record = ResolutionRecord {
            name: "www.example.com".to_string(),
            record_type: 1,
            ttl: None,
            data: "93.184.216.34".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], 1);
        assert!(value.get("TTL").is_none());
    }

    #[test]
    fn report_uses_camel_case_keys() {
        let now = Utc::now();
        let report = ScanReport {
            domain: "example.com".to_string(),
            total_candidates: 4,
            found: vec![SubdomainResult::present("www.example.com", vec![])],
            started_at: now,
            finished_at: now,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalCandidates"], 4);
        assert!(value.get("startedAt").is_some());
        assert!(value.get("finishedAt").is_some());
        assert_eq!(report.discovery_rate(), 0.25);
    }

    #[test]
    fn unknown_type_code_falls_back_to_number() {
        assert_eq!(RecordType::from_code(99), None);
        assert_eq!(RecordType::AAAA.code(), 28);
    }
}
