/// 内置的常见子域名字典
const COMMON_SUBDOMAINS: &[&str] = &[
    "www", "mail", "webmail", "smtp", "pop", "imap", "mx", "ns1", "ns2", "dns",
    "api", "api2", "app", "apps", "admin", "portal", "dashboard", "console", "panel", "cpanel",
    "dev", "development", "test", "testing", "qa", "uat", "stage", "staging", "preprod", "prod",
    "beta", "alpha", "demo", "sandbox", "static", "assets", "cdn", "img", "images", "media",
    "files", "download", "downloads", "upload", "docs", "doc", "wiki", "help", "support", "status",
    "blog", "news", "shop", "store", "pay", "payment", "billing", "account", "accounts", "login",
    "auth", "sso", "id", "oauth", "vpn", "remote", "gateway", "proxy", "git", "gitlab",
    "jenkins", "ci", "build", "jira", "confluence", "grafana", "kibana", "monitor", "metrics", "logs",
    "db", "mysql", "redis", "search", "m", "mobile", "internal", "intranet", "corp", "secure",
];

/// 默认字典，作为配置注入暴破生成器
pub fn default_wordlist() -> Vec<String> {
    COMMON_SUBDOMAINS.iter().map(|&s| s.to_string()).collect()
}
