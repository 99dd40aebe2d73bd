//! Movement keys.
//!
//! The classic vi layout: `h j k l` for the orthogonals, `y u b n` for the
//! diagonals, and `<` / `>` to climb.
use delver_core::Delta;

pub fn delta_for_key(key: char) -> Option<Delta> {
    let delta = match key {
        'h' => Delta::new(-1, 0),
        'j' => Delta::new(0, 1),
        'k' => Delta::new(0, -1),
        'l' => Delta::new(1, 0),
        'y' => Delta::new(-1, -1),
        'u' => Delta::new(1, -1),
        'b' => Delta::new(-1, 1),
        'n' => Delta::new(1, 1),
        '<' => Delta::vertical(-1),
        '>' => Delta::vertical(1),
        _ => return None,
    };
    Some(delta)
}

/// Parses a whole key string, ignoring whitespace.
pub fn parse_keys(keys: &str) -> anyhow::Result<Vec<Delta>> {
    keys.chars()
        .filter(|key| !key.is_whitespace())
        .map(|key| delta_for_key(key).ok_or_else(|| anyhow::anyhow!("Unknown movement key '{key}'")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vi_keys() {
        let path = parse_keys("ll j >").unwrap();
        assert_eq!(
            path,
            vec![
                Delta::new(1, 0),
                Delta::new(1, 0),
                Delta::new(0, 1),
                Delta::vertical(1)
            ]
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = parse_keys("lx").unwrap_err();
        assert!(error.to_string().contains("'x'"));
    }
}
