use super::{Error, Result};

const ROW_LABELS: &str = "abcdefghijklmnopqrstuvwxyz";
const PASS_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Return `n_voters` zero-padded index names: `p0, p1, ...` (width uniform
/// across the list, and the list itself is in increasing order).
pub fn p_list(n_voters: usize) -> Vec<String> {
    let width = n_voters.to_string().len();
    (0..n_voters).map(|x| format!("p{x:0width$}")).collect()
}

/// Return `rows` row-index names: `a, b, c, ...`. At most 26 rows are
/// representable with single-letter labels.
pub fn row_list(rows: usize) -> Result<Vec<char>> {
    if rows > ROW_LABELS.len() {
        return Err(Error::RowCountTooLarge(rows));
    }
    Ok(ROW_LABELS.chars().take(rows).collect())
}

/// Return `n_reps` pass-index names: `A, B, C, ...`. At most 26 passes are
/// representable with single-letter labels.
pub fn k_list(n_reps: usize) -> Result<Vec<char>> {
    if n_reps > PASS_LABELS.len() {
        return Err(Error::PassCountTooLarge(n_reps));
    }
    Ok(PASS_LABELS.chars().take(n_reps).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_list_pads_to_uniform_width() {
        assert_eq!(p_list(3), vec!["p0", "p1", "p2"]);
        assert_eq!(p_list(10), vec![
            "p00", "p01", "p02", "p03", "p04", "p05", "p06", "p07", "p08", "p09",
        ]);
    }

    #[test]
    fn row_list_is_lowercase_letters() {
        assert_eq!(row_list(3).unwrap(), vec!['a', 'b', 'c']);
        assert!(row_list(27).is_err());
    }

    #[test]
    fn k_list_is_uppercase_letters() {
        assert_eq!(k_list(4).unwrap(), vec!['A', 'B', 'C', 'D']);
        assert!(k_list(27).is_err());
    }
}
