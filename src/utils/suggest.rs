//! Close-match suggestions for names the user mistyped.

/// Candidates resembling `input`, best first: exact (case-insensitive),
/// prefix, suffix, then edit distance of at most 3.
pub fn suggestions(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let input_lower = input.to_lowercase();
    if input_lower.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|c| rank(&input_lower, &c.to_lowercase()).map(|r| (r, c)))
        .collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let mut out: Vec<String> = Vec::new();
    for (_, candidate) in ranked {
        if !out.contains(candidate) {
            out.push(candidate.clone());
        }
        if out.len() == limit {
            break;
        }
    }
    out
}

fn rank(input_lower: &str, candidate_lower: &str) -> Option<usize> {
    if candidate_lower == input_lower {
        return Some(0);
    }
    if candidate_lower.starts_with(input_lower) {
        return Some(1);
    }
    if candidate_lower.ends_with(input_lower) {
        return Some(2);
    }
    let dist = levenshtein(input_lower, candidate_lower);
    (dist <= 3).then_some(2 + dist)
}

/// Simple Levenshtein distance implementation.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b_len {
        matrix[0][j] = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}
