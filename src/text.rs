/// Turns a human name into a canonical token: leading dashes are dropped and
/// camelCase becomes kebab-case, so `--logFile` turns into `log-file`.
pub fn escape(name: &str) -> String {
    let mut res = String::with_capacity(name.len());
    for c in name.trim_start_matches('-').chars() {
        if c.is_uppercase() && !res.is_empty() && !res.ends_with('-') {
            res.push('-');
        }
        res.extend(c.to_lowercase());
    }
    res
}

/// Normalizes a description: whitespace collapsed, first letter uppercase,
/// terminated with a full stop unless it already ends in `.`, `?` or `!`.
pub fn sentence(text: &str) -> String {
    let mut res = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if res.is_empty() {
        return res;
    }
    if !res.ends_with(['.', '?', '!']) {
        res.push('.');
    }
    let mut chars = res.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => res,
    }
}
