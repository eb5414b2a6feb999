/// Case, `_` and `-` are ignored when comparing names, so `dataid`,
/// `data_id` and `dataId` all look alike.
fn fold(value: &str) -> Vec<char> {
    value
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn score(input: &[char], candidate: &str) -> Option<usize> {
    let folded = fold(candidate);
    if input.is_empty() || folded.is_empty() {
        return None;
    }
    if input == folded.as_slice() {
        return Some(0);
    }
    let haystack: String = folded.iter().collect();
    let needle: String = input.iter().collect();
    if haystack.contains(&needle) || needle.contains(&haystack) {
        return Some(1);
    }
    Some(edit_distance(input, &folded))
}

fn tolerance(len: usize) -> usize {
    match len {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        _ => (len as f32 * 0.35).floor().max(3.0) as usize,
    }
}

/// Up to `limit` candidates close to `input`, best first.
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let folded = fold(input);
    if folded.is_empty() || candidates.is_empty() {
        return Vec::new();
    }
    let allowed = tolerance(folded.len());

    let mut scored: Vec<(&String, usize)> = candidates
        .iter()
        .filter_map(|candidate| score(&folded, candidate).map(|s| (candidate, s)))
        .filter(|(_, s)| *s <= allowed)
        .collect();
    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.len().cmp(&b.0.len()))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut out: Vec<String> = Vec::new();
    for (candidate, _) in scored {
        if !out.contains(candidate) {
            out.push(candidate.clone());
        }
        if out.len() >= limit.max(1) {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ignores_case_and_separators() {
        let props = names(&["dataId", "group", "namespace"]);
        assert_eq!(suggest("data_id", &props, 3), vec!["dataId"]);
    }

    #[test]
    fn near_misses_rank_by_distance() {
        let tools = names(&["list_services", "list_service_instances", "list_clients"]);
        let out = suggest("list_servcies", &tools, 3);
        assert_eq!(out.first().map(String::as_str), Some("list_services"));
    }

    #[test]
    fn unrelated_input_yields_nothing() {
        let tools = names(&["get_config", "list_configs"]);
        assert!(suggest("zzzz", &tools, 3).is_empty());
        assert!(suggest("  ", &tools, 3).is_empty());
    }
}
