/// Check that exactly one of a set of optional fields is populated.
///
/// Returns the index of the single populated field, or the names of every
/// populated field on violation (empty for the zero-populated case). Callers
/// own the mapping into their domain error so the same combinator serves
/// actor blocks and ingress-service descriptors.
pub fn require_exactly_one(fields: &[(&'static str, bool)]) -> Result<usize, Vec<String>> {
    let populated: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, (_, set))| *set)
        .map(|(index, _)| index)
        .collect();

    match populated.as_slice() {
        [only] => Ok(*only),
        _ => Err(populated
            .iter()
            .map(|&index| fields[index].0.to_string())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[("a", true), ("b", false), ("c", false)], 0, "first populated")]
    #[case(&[("a", false), ("b", false), ("c", true)], 2, "last populated")]
    #[case(&[("only", true)], 0, "single field")]
    fn exactly_one_returns_index(
        #[case] fields: &[(&'static str, bool)],
        #[case] expected: usize,
        #[case] _description: &str,
    ) {
        assert_eq!(require_exactly_one(fields).unwrap(), expected);
    }

    #[rstest]
    #[case(&[("a", false), ("b", false)], 0, "none populated")]
    #[case(&[("a", true), ("b", true)], 2, "two populated")]
    #[case(&[("a", true), ("b", true), ("c", true)], 3, "all populated")]
    fn violations_report_populated_names(
        #[case] fields: &[(&'static str, bool)],
        #[case] expected_len: usize,
        #[case] _description: &str,
    ) {
        let populated = require_exactly_one(fields).unwrap_err();
        assert_eq!(populated.len(), expected_len);
    }

    #[test]
    fn violation_carries_field_names_in_order() {
        let populated = require_exactly_one(&[("a", true), ("b", false), ("c", true)]).unwrap_err();
        assert_eq!(populated, vec!["a".to_string(), "c".to_string()]);
    }
}
