use clap::Parser;

use crate::api::ScanOptions;

/// 输出格式枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
    Csv,
    Txt,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            "csv" => Ok(OutputFormat::Csv),
            "txt" => Ok(OutputFormat::Txt),
            _ => Err(format!("不支持的输出格式: {}。支持的格式: json, xml, csv, txt", s)),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "subrecon")]
#[command(version)]
#[command(about = "Passive and wordlist subdomain discovery with DoH validation", long_about = None, arg_required_else_help = true)]
pub struct Opts {
    /// target domain, may be repeated
    #[arg(short, long, required = true)]
    pub domain: Vec<String>,

    /// skip DNS validation and list every candidate
    #[arg(long)]
    pub no_validate: bool,

    /// skip wordlist candidates
    #[arg(long)]
    pub no_brute: bool,

    /// concurrent DNS validations
    #[arg(short, long, default_value_t = 20)]
    pub concurrency: usize,

    /// wordlist path, one word per line (built-in list by default)
    #[arg(short, long)]
    pub file: Option<String>,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long, default_value = crate::dns_resolver::DEFAULT_DOH_ENDPOINT)]
    pub doh: String,

    /// per-lookup DNS timeout in seconds
    #[arg(long, default_value_t = 4)]
    pub dns_timeout: u64,

    /// per-request passive source timeout in seconds
    #[arg(long, default_value_t = 8)]
    pub source_timeout: u64,

    /// output file path
    #[arg(short, long)]
    pub output: Option<String>,

    /// output format (json, xml, csv, txt)
    #[arg(long, default_value = "json")]
    pub format: String,

    /// show summary statistics
    #[arg(long)]
    pub summary: bool,

    /// silent, only warnings and errors
    #[arg(short, long)]
    pub silent: bool,

    /// verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Opts {
    /// 命令行参数转换为扫描选项
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            dns_validate: !self.no_validate,
            brute_force: !self.no_brute,
            concurrency: self.concurrency,
        }
    }
}
