use std::fs::File;
use std::io::Write;

use log::info;

use crate::error::ScanError;
use crate::input::OutputFormat;
use crate::model::ScanReport;
use crate::summary::generate_summary;

/// 导出扫描报告到文件
pub fn export_report(
    report: &ScanReport,
    output_path: &str,
    format: &OutputFormat,
) -> Result<(), ScanError> {
    let content = render_report(report, format)?;
    let mut file = File::create(output_path)?;
    file.write_all(content.as_bytes())?;

    info!("结果已导出到: {}", output_path);
    Ok(())
}

/// 按格式渲染报告
pub fn render_report(report: &ScanReport, format: &OutputFormat) -> Result<String, ScanError> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Xml => export_to_xml(report),
        OutputFormat::Csv => export_to_csv(report),
        OutputFormat::Txt => export_to_txt(report),
    };
    Ok(content)
}

fn format_time(report: &ScanReport) -> (String, String) {
    (
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// 导出为XML格式
fn export_to_xml(report: &ScanReport) -> String {
    let (started, finished) = format_time(report);
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<subrecon_report>\n");
    xml.push_str(&format!("  <domain>{}</domain>\n", escape_xml(&report.domain)));
    xml.push_str(&format!("  <total_candidates>{}</total_candidates>\n", report.total_candidates));
    xml.push_str(&format!("  <started_at>{}</started_at>\n", started));
    xml.push_str(&format!("  <finished_at>{}</finished_at>\n", finished));

    xml.push_str("  <found>\n");
    for result in &report.found {
        xml.push_str("    <subdomain>\n");
        xml.push_str(&format!("      <host>{}</host>\n", escape_xml(&result.host)));
        xml.push_str(&format!("      <exists>{}</exists>\n", result.exists));
        xml.push_str("      <records>\n");
        for record in &result.records {
            xml.push_str(&format!(
                "        <record type=\"{}\" ttl=\"{}\" name=\"{}\">{}</record>\n",
                record.record_type,
                record.ttl.map_or("N/A".to_string(), |t| t.to_string()),
                escape_xml(&record.name),
                escape_xml(&record.data)
            ));
        }
        xml.push_str("      </records>\n");
        xml.push_str("    </subdomain>\n");
    }
    xml.push_str("  </found>\n");

    xml.push_str("</subrecon_report>\n");
    xml
}

/// 导出为CSV格式，每条记录一行，没有记录的子域名占一行
fn export_to_csv(report: &ScanReport) -> String {
    let mut csv = String::new();
    csv.push_str("Host,Exists,RecordName,RecordType,TTL,Data\n");

    for result in &report.found {
        if result.records.is_empty() {
            csv.push_str(&format!("{},{},,,,\n", escape_csv(&result.host), result.exists));
            continue;
        }
        for record in &result.records {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                escape_csv(&result.host),
                result.exists,
                escape_csv(&record.name),
                record.type_name(),
                record.ttl.map_or(String::new(), |t| t.to_string()),
                escape_csv(&record.data)
            ));
        }
    }

    csv
}

/// 导出为TXT格式
fn export_to_txt(report: &ScanReport) -> String {
    let (started, finished) = format_time(report);
    let summary = generate_summary(report);
    let mut txt = String::new();

    txt.push_str(&format!("subrecon 扫描结果报告: {}\n", report.domain));
    txt.push_str(&format!("开始时间: {}\n", started));
    txt.push_str(&format!("结束时间: {}\n", finished));
    txt.push_str(&format!("{}\n\n", "=".repeat(60)));

    txt.push_str("汇总统计:\n");
    txt.push_str(&format!("  候选子域名总数: {}\n", summary.total_candidates));
    txt.push_str(&format!("  存在的子域名: {}\n", summary.found_hosts));
    txt.push_str(&format!("  唯一IP数量: {}\n", summary.unique_ips.len()));
    txt.push('\n');

    txt.push_str("记录类型分布:\n");
    for (record_type, count) in &summary.record_types {
        txt.push_str(&format!("  {}: {}\n", record_type, count));
    }
    txt.push('\n');

    txt.push_str("子域名:\n");
    txt.push_str(&format!("{:<40} {:<45} {:<7}\n", "域名", "记录", "类型"));
    txt.push_str(&format!("{}\n", "-".repeat(95)));
    for result in &report.found {
        txt.push_str(&format!("{}\n", result));
    }

    txt
}

/// XML转义
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// CSV转义
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
