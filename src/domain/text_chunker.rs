//! 文本切分
//!
//! 合成引擎单次请求有字符上限，长文本需要切成若干块依次请求。
//! 切分优先落在句末标点，其次是逗号类标点，再次是空白，
//! 最后才按字符硬切（如无空格的中日文长句）。

/// 检查是否为强分隔符（句末标点，总是分割）
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '。' | '？' | '！' | '.' | '?' | '!' | '\n')
}

/// 检查是否为弱分隔符（逗号等，仅在片段过长时使用）
#[inline]
fn is_weak_delimiter(ch: char) -> bool {
    matches!(ch, '，' | '；' | '：' | '、' | ',' | ';' | ':')
}

/// 只包含标点或空白的片段没有可朗读内容
#[inline]
fn is_trivial_segment(s: &str) -> bool {
    !s.chars().any(char::is_alphanumeric)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 按给定分隔符分割，分隔符保留在前一个片段末尾
fn split_after(text: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if is_delimiter(ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                segments.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }

    segments
}

/// 按字符硬切
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect::<String>())
        .collect()
}

/// 把超长片段拆成不超过 max_chars 的小片段
fn split_oversized(segment: &str, max_chars: usize) -> Vec<String> {
    if char_len(segment) <= max_chars {
        return vec![segment.to_string()];
    }

    let mut pieces = Vec::new();
    for clause in split_after(segment, is_weak_delimiter) {
        if char_len(&clause) <= max_chars {
            pieces.push(clause);
            continue;
        }
        for word in clause.split_whitespace() {
            if char_len(word) <= max_chars {
                pieces.push(word.to_string());
            } else {
                pieces.extend(hard_split(word, max_chars));
            }
        }
    }
    pieces
}

/// 贪心合并相邻片段，直到再加一个就会超过 max_chars
fn merge_up_to(pieces: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for piece in pieces {
        if buffer.is_empty() {
            buffer = piece;
            continue;
        }
        if char_len(&buffer) + 1 + char_len(&piece) <= max_chars {
            buffer.push(' ');
            buffer.push_str(&piece);
        } else {
            chunks.push(std::mem::replace(&mut buffer, piece));
        }
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}

/// 将文本切分为不超过 `max_chars` 个字符的块，顺序与原文一致
///
/// `max_chars` 为 0 时视为不限制
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 || char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let pieces: Vec<String> = split_after(text, is_strong_delimiter)
        .into_iter()
        .flat_map(|s| split_oversized(&s, max_chars))
        .collect();

    merge_up_to(pieces, max_chars)
        .into_iter()
        .filter(|c| !is_trivial_segment(c))
        .collect()
}

/// 文本预览：取前 `max_chars` 个字符，超出时追加省略号
pub fn preview_text(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let mut preview: String = text.chars().take(max_chars).collect();
    preview.push_str("...");
    preview
}
