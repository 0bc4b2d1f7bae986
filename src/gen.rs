use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// 字典暴破候选：每个词拼接到目标域名前面，最后附加域名本身。
///
/// 纯函数，不做过滤，结果顺序与字典顺序一致。
pub fn generate_candidates<S: AsRef<str>>(domain: &str, words: &[S]) -> Vec<String> {
    let base = domain.trim_end_matches('.').to_lowercase();
    let mut candidates: Vec<String> = words
        .iter()
        .map(|word| format!("{}.{}", word.as_ref(), base))
        .collect();
    candidates.push(base);
    candidates
}

/// 从文件加载字典，每行一个词，跳过空行和 `#` 注释
pub fn load_wordlist<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = io::BufReader::new(file);
    let mut words = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        words.push(word.to_string());
    }

    Ok(words)
}
