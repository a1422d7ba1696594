//! Plain-text inputs of the build tools.

use bunsetsu_core::xchar::xstr_hash_str;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TextError {
    #[error("line {line}: expected `row col value`")]
    MatrixLine { line: usize },

    #[error("expected name=path, got `{0}`")]
    SectionSpec(String),

    #[error("bad candidate index `{0}`")]
    Choice(String),
}

/// A matrix key: an integer, or any other token hashed as a surface.
fn matrix_key(token: &str) -> i32 {
    token.parse().unwrap_or_else(|_| xstr_hash_str(token))
}

/// Parse `row col value` lines; `#` starts a comment line. Rows and
/// columns that are not integers are word surfaces, so a usage list can be
/// written as `私 感じ 1`.
pub fn parse_matrix_text(text: &str) -> Result<Vec<(i32, i32, i32)>, TextError> {
    let mut cells = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [row, col, value] = tokens.as_slice() else {
            return Err(TextError::MatrixLine { line: i + 1 });
        };
        let value = value
            .parse()
            .map_err(|_| TextError::MatrixLine { line: i + 1 })?;
        cells.push((matrix_key(row), matrix_key(col), value));
    }
    Ok(cells)
}

/// Split a `name=path` section argument.
pub fn parse_section_spec(spec: &str) -> Result<(&str, &str), TextError> {
    match spec.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => Ok((name, path)),
        _ => Err(TextError::SectionSpec(spec.to_string())),
    }
}

/// Parse a comma separated list of candidate indices.
pub fn parse_choices(list: &str) -> Result<Vec<usize>, TextError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| TextError::Choice(s.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_lines_accept_numbers_and_words() {
        let cells = parse_matrix_text("# usage\n1 2 3\n\n私 感じ 1\n").unwrap();
        assert_eq!(
            cells,
            vec![(1, 2, 3), (xstr_hash_str("私"), xstr_hash_str("感じ"), 1)]
        );
    }

    #[test]
    fn test_matrix_line_needs_three_fields() {
        assert_eq!(
            parse_matrix_text("1 2 3\n1 2\n"),
            Err(TextError::MatrixLine { line: 2 })
        );
        assert_eq!(
            parse_matrix_text("1 2 many\n"),
            Err(TextError::MatrixLine { line: 1 })
        );
    }

    #[test]
    fn test_section_spec_splits_on_first_equals() {
        assert_eq!(
            parse_section_spec("word_dic=out/a=b.bin"),
            Ok(("word_dic", "out/a=b.bin"))
        );
        assert!(parse_section_spec("word_dic").is_err());
        assert!(parse_section_spec("=x").is_err());
    }

    #[test]
    fn test_choices_are_comma_separated() {
        assert_eq!(parse_choices("0, 2,1"), Ok(vec![0, 2, 1]));
        assert_eq!(parse_choices(""), Ok(vec![]));
        assert_eq!(parse_choices("0,x"), Err(TextError::Choice("x".into())));
    }
}
