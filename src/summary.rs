use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;

use colored::Colorize;

use crate::model::{ScanReport, SubdomainResult};

/// 汇总统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub domain: String,
    pub total_candidates: usize,
    pub found_hosts: usize,
    pub discovery_rate: f64,
    pub unique_ips: BTreeSet<String>,
    pub ip_ranges: BTreeMap<String, Vec<String>>,
    pub record_types: BTreeMap<String, usize>,
    pub duration_ms: i64,
}

impl fmt::Display for SubdomainResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return write!(f, "{:<40} {:<45} {:<7}", self.host, "-", "-");
        }
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let host = if i == 0 { self.host.as_str() } else { "" };
            write!(f, "{:<40} {:<45} {:<7}", host, record.data, record.type_name())?;
        }
        Ok(())
    }
}

/// 从扫描报告生成汇总统计
pub fn generate_summary(report: &ScanReport) -> SummaryStats {
    let mut unique_ips = BTreeSet::new();
    let mut ip_ranges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut record_types = BTreeMap::new();

    for result in &report.found {
        for record in &result.records {
            *record_types.entry(record.type_name()).or_insert(0) += 1;

            if let Ok(ip) = record.data.parse::<IpAddr>() {
                if unique_ips.insert(record.data.clone()) {
                    // 计算IPv4 /24段
                    if let IpAddr::V4(ipv4) = ip {
                        let octets = ipv4.octets();
                        let range = format!("{}.{}.{}.0/24", octets[0], octets[1], octets[2]);
                        ip_ranges.entry(range).or_default().push(record.data.clone());
                    }
                }
            }
        }
    }

    SummaryStats {
        domain: report.domain.clone(),
        total_candidates: report.total_candidates,
        found_hosts: report.found_hosts(),
        discovery_rate: report.discovery_rate(),
        unique_ips,
        ip_ranges,
        record_types,
        duration_ms: (report.finished_at - report.started_at).num_milliseconds(),
    }
}

/// 打印结果表格
pub fn print_result_table(report: &ScanReport) {
    println!(
        "\n{:<40} {:<45} {:<7}",
        "域名".bold(),
        "记录".bold(),
        "类型".bold()
    );
    println!("{}", "-".repeat(95));

    for result in &report.found {
        if result.exists {
            println!("{}", result.to_string().green());
        } else {
            println!("{}", result.to_string().dimmed());
        }
    }
}

/// 打印汇总信息
pub fn print_summary(summary: &SummaryStats) {
    println!("\n{}", "=".repeat(60));
    println!("                    汇总统计: {}", summary.domain.cyan());
    println!("{}", "=".repeat(60));

    println!("候选子域名总数: {}", summary.total_candidates);
    println!("存在的子域名: {}", summary.found_hosts.to_string().green());
    println!("发现率: {:.2}%", summary.discovery_rate * 100.0);
    println!("唯一IP数量: {}", summary.unique_ips.len());
    println!("耗时: {} ms", summary.duration_ms);

    if !summary.record_types.is_empty() {
        println!("\n记录类型分布:");
        for (record_type, count) in &summary.record_types {
            println!("  {}: {}", record_type, count);
        }
    }

    if !summary.ip_ranges.is_empty() {
        println!("\nIP段分布 (前10个):");
        let mut sorted_ranges: Vec<_> = summary.ip_ranges.iter().collect();
        sorted_ranges.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        for (range, ips) in sorted_ranges.iter().take(10) {
            println!("  {}: {} 个IP", range, ips.len());
        }
    }

    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolutionRecord;
    use chrono::{Duration, Utc};

    fn record(name: &str, record_type: u16, data: &str) -> ResolutionRecord {
        ResolutionRecord {
            name: name.to_string(),
            record_type,
            ttl: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn summarizes_records_and_ips() {
        let started_at = Utc::now();
        let report = ScanReport {
            domain: "example.com".to_string(),
            total_candidates: 10,
            found: vec![
                SubdomainResult::present(
                    "www.example.com",
                    vec![
                        record("www.example.com", 1, "93.184.216.34"),
                        record("www.example.com", 28, "2606:2800:220:1::"),
                    ],
                ),
                SubdomainResult::present(
                    "api.example.com",
                    vec![
                        record("api.example.com", 5, "edge.example.net."),
                        record("edge.example.net", 1, "93.184.216.34"),
                        record("api.example.com", 16, "v=spf1 -all"),
                    ],
                ),
            ],
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
        };

        let summary = generate_summary(&report);
        assert_eq!(summary.found_hosts, 2);
        assert_eq!(summary.discovery_rate, 0.2);
        assert_eq!(summary.unique_ips.len(), 2);
        assert_eq!(summary.ip_ranges["93.184.216.0/24"], vec!["93.184.216.34"]);
        assert_eq!(summary.record_types["A"], 2);
        assert_eq!(summary.record_types["CNAME"], 1);
        assert_eq!(summary.record_types["TXT"], 1);
        assert_eq!(summary.duration_ms, 1500);
    }

    #[test]
    fn unvalidated_candidates_do_not_count_as_discovered() {
        let now = Utc::now();
        let report = ScanReport {
            domain: "example.com".to_string(),
            total_candidates: 3,
            found: vec![
                SubdomainResult::absent("a.example.com"),
                SubdomainResult::absent("b.example.com"),
                SubdomainResult::absent("example.com"),
            ],
            started_at: now,
            finished_at: now,
        };

        let summary = generate_summary(&report);
        assert_eq!(summary.found_hosts, 0);
        assert_eq!(summary.discovery_rate, 0.0);
    }

    #[test]
    fn displays_one_line_per_record() {
        let result = SubdomainResult::present(
            "www.example.com",
            vec![
                record("www.example.com", 1, "93.184.216.34"),
                record("www.example.com", 28, "2606:2800:220:1::"),
            ],
        );
        let text = result.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("www.example.com"));
        assert!(SubdomainResult::absent("x.example.com").to_string().contains('-'));
    }
}
