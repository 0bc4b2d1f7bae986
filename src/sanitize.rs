use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ScanError;

lazy_static! {
    /// 单条数据源记录里可能用空白、换行或逗号打包多个域名
    static ref NAME_SEPARATORS: Regex = Regex::new(r"[\s,]+").unwrap();
    static ref SCHEME_PREFIX: Regex = Regex::new(r"^https?://").unwrap();
}

/// 规范化用户输入的目标域名：小写、去掉协议头、末尾的斜杠和点
pub fn normalize_domain(input: &str) -> Result<String, ScanError> {
    let lowered = input.trim().to_lowercase();
    let without_scheme = SCHEME_PREFIX.replace(&lowered, "");
    let domain = without_scheme
        .strip_suffix('/')
        .unwrap_or(&without_scheme[..])
        .trim_end_matches('.')
        .to_string();

    if domain.is_empty() {
        return Err(ScanError::InvalidDomain);
    }
    Ok(domain)
}

/// 转换为IDNA ASCII形式，失败时保留原字符串
fn to_ascii(host: &str) -> String {
    match idna::domain_to_ascii(host) {
        Ok(ascii) if !ascii.is_empty() => ascii,
        _ => host.to_string(),
    }
}

/// 单个名字的清洗：小写、去掉通配符标签、去掉首尾的点
fn clean_name(piece: &str) -> String {
    let mut lowered = piece.to_lowercase();
    while lowered.contains("*.") {
        lowered = lowered.replace("*.", "");
    }
    // IDNA映射可能产生新的首尾点（例如全角句号）
    to_ascii(lowered.trim_matches('.'))
        .trim_matches('.')
        .to_string()
}

/// 判断名字是否属于目标域名（等于域名或以 `.域名` 结尾）
pub fn is_likely_subdomain(name: &str, domain: &str) -> bool {
    let name = name.to_lowercase();
    let name = name.trim_start_matches("*.").trim_end_matches('.');
    let domain = domain.to_lowercase();
    let domain = domain.trim_end_matches('.');

    if domain.is_empty() {
        return false;
    }
    name == domain || name.ends_with(&format!(".{}", domain))
}

/// 清洗轮数上限，正常输入两轮内即稳定
const MAX_CLEAN_ROUNDS: usize = 4;

/// 把一条原始记录拆分并清洗到稳定形式。
///
/// IDNA映射可能产生新的分隔符或通配符（全角逗号、全角星号），
/// 所以清洗后的结果会重新拆分、再次清洗，直到不再变化。
fn expand_names(raw: &str) -> Vec<String> {
    let mut pending = vec![(raw.to_string(), 0usize)];
    let mut stable = Vec::new();

    while let Some((item, round)) = pending.pop() {
        for piece in NAME_SEPARATORS.split(&item) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let cleaned = clean_name(piece);
            if cleaned.is_empty() {
                continue;
            }
            if cleaned == piece {
                stable.push(cleaned);
            } else if round < MAX_CLEAN_ROUNDS {
                pending.push((cleaned, round + 1));
            }
        }
    }

    stable
}

/// 把各数据源的原始名字清洗成去重后的候选集合。
///
/// 这个函数不会失败：格式错误或不在范围内的名字直接丢弃。
pub fn sanitize<S: AsRef<str>>(raw_names: &[S], domain: &str) -> BTreeSet<String> {
    let scope = to_ascii(domain.to_lowercase().trim_matches('.'));
    let mut out = BTreeSet::new();

    for raw in raw_names {
        for name in expand_names(raw.as_ref()) {
            if is_likely_subdomain(&name, &scope) {
                out.insert(name);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_input() -> Vec<String> {
        vec![
            "www.example.com\n*.api.example.com".to_string(),
            "WWW.Example.COM.".to_string(),
            "mail.example.com, dev.example.com".to_string(),
            "  .cdn.example.com  ".to_string(),
            "example.com".to_string(),
            "evil-example.com".to_string(),
            "example.com.attacker.net".to_string(),
            "".to_string(),
            "   \n  ".to_string(),
            "bücher.example.com".to_string(),
        ]
    }

    #[test]
    fn splits_and_normalizes() {
        let out = sanitize(&noisy_input(), "example.com");
        let expected: BTreeSet<String> = [
            "www.example.com",
            "api.example.com",
            "mail.example.com",
            "dev.example.com",
            "cdn.example.com",
            "example.com",
            "xn--bcher-kva.example.com",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize(&noisy_input(), "example.com");
        let as_vec: Vec<String> = once.iter().cloned().collect();
        let twice = sanitize(&as_vec, "example.com");
        assert_eq!(once, twice);
    }

    #[test]
    fn every_output_is_in_scope() {
        let out = sanitize(&noisy_input(), "example.com");
        for name in &out {
            assert!(name == "example.com" || name.ends_with(".example.com"), "{}", name);
        }
    }

    #[test]
    fn no_case_equal_duplicates() {
        let input = vec!["WWW.example.com", "www.EXAMPLE.com", "www.example.com"];
        let out = sanitize(&input, "example.com");
        assert_eq!(out.len(), 1);
        let lowered: BTreeSet<String> = out.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(lowered.len(), out.len());
    }

    #[test]
    fn fullwidth_separators_and_wildcards_are_normalized() {
        let input = vec!["＊.api.example.com", "a，b.example.com", "x﹐www.example.com"];
        let once = sanitize(&input, "example.com");
        let expected: BTreeSet<String> = ["api.example.com", "b.example.com", "www.example.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(once, expected);
        for name in &once {
            assert!(!name.contains('*') && !name.contains(','), "{}", name);
        }

        let as_vec: Vec<String> = once.iter().cloned().collect();
        assert_eq!(sanitize(&as_vec, "example.com"), once);
    }

    #[test]
    fn malformed_input_is_dropped_not_raised() {
        let input = vec!["*.", ".", ",,,", "\t", "**..example..com"];
        let out = sanitize(&input, "example.com");
        assert!(out.iter().all(|n| n.ends_with("example.com")));
    }

    #[test]
    fn scope_check_rejects_suffix_lookalikes() {
        assert!(is_likely_subdomain("a.example.com", "example.com"));
        assert!(is_likely_subdomain("*.a.example.com.", "example.com"));
        assert!(is_likely_subdomain("example.com", "example.com"));
        assert!(!is_likely_subdomain("notexample.com", "example.com"));
        assert!(!is_likely_subdomain("example.com", ""));
    }

    #[test]
    fn normalize_domain_strips_scheme_and_slash() {
        assert_eq!(normalize_domain("  HTTPS://Example.com/ ").unwrap(), "example.com");
        assert_eq!(normalize_domain("http://example.com").unwrap(), "example.com");
        assert_eq!(normalize_domain("example.com.").unwrap(), "example.com");
        assert!(matches!(normalize_domain("   "), Err(ScanError::InvalidDomain)));
        assert!(matches!(normalize_domain("https://"), Err(ScanError::InvalidDomain)));
    }
}
