use std::path::Path;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};
use subrecon::input::{Opts, OutputFormat};
use subrecon::output::export_report;
use subrecon::summary::{generate_summary, print_result_table, print_summary};
use subrecon::{gen, logger, subdata};
use subrecon::{ScanConfig, ScanEngine, ScanReport};

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    logger::init_logger(opts.verbose, opts.silent);

    if let Err(e) = run(opts).await {
        error!("扫描失败: {}", e);
        std::process::exit(1);
    }
}

/// 按命令行参数构建引擎并依次扫描每个域名
async fn run(opts: Opts) -> Result<(), Box<dyn std::error::Error>> {
    let wordlist = match &opts.file {
        Some(path) => {
            let words = gen::load_wordlist(path)?;
            info!("从 {} 加载 {} 个字典词", path, words.len());
            words
        }
        None => subdata::default_wordlist(),
    };

    let config = ScanConfig {
        doh_endpoint: opts.doh.clone(),
        dns_timeout: Duration::from_secs(opts.dns_timeout),
        source_timeout: Duration::from_secs(opts.source_timeout),
        wordlist,
        ..Default::default()
    };
    let engine = ScanEngine::new(config)?;
    let options = opts.scan_options();

    let format = opts.format.parse::<OutputFormat>().unwrap_or_else(|e| {
        warn!("输出格式解析错误: {}, 使用默认JSON格式", e);
        OutputFormat::Json
    });

    let mut reports: Vec<ScanReport> = Vec::new();
    for domain in &opts.domain {
        match engine.scan(domain, &options).await {
            Ok(report) => {
                if !opts.silent {
                    print_result_table(&report);
                }
                if opts.summary {
                    print_summary(&generate_summary(&report));
                }
                reports.push(report);
            }
            Err(e) => error!("跳过 {:?}: {}", domain, e),
        }
    }

    if let Some(output_path) = &opts.output {
        for report in &reports {
            let path = output_path_for(output_path, &report.domain, reports.len());
            export_report(report, &path, &format)?;
        }
    }

    Ok(())
}

/// 多个域名时在文件名后附加域名，避免互相覆盖
fn output_path_for(base: &str, domain: &str, total: usize) -> String {
    if total <= 1 {
        return base.to_string();
    }
    let path = Path::new(base);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("report");
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, domain, ext),
        None => format!("{}-{}", stem, domain),
    };
    path.with_file_name(file_name).to_string_lossy().into_owned()
}
