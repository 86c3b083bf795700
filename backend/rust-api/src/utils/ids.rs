use rand::Rng;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_SUFFIX_LEN: usize = 8;

/// Short human-friendly id such as `RE-7K2Q9XA1`.
pub fn generate_prefixed_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("{}-{}", prefix, suffix)
}

pub fn generate_report_id() -> String {
    generate_prefixed_id("RE")
}

/// Joins `parts` with `:` after escaping `%` and `:` in each part, so distinct
/// part lists never produce the same key.
pub fn compound_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.replace('%', "%25").replace(':', "%3A"))
        .collect::<Vec<_>>()
        .join(":")
}
