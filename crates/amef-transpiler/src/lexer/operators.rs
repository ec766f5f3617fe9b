//! Operator table and longest-match lookup.
//!
//! Operators are matched greedily against a fixed table, so `>>>=` wins
//! over `>>>`, `>>` and `>`. `=>` is an ordinary operator at this stage;
//! the classifier turns it into a keyword.
//!
//! | Length | Operators |
//! |--------|-----------|
//! | 4 | `>>>=` |
//! | 3 | `===` `!==` `**=` `<<=` `>>=` `>>>` `??=` `\|\|=` `&&=` `...` |
//! | 2 | `<=` `>=` `==` `!=` `=>` `**` `++` `--` `<<` `>>` `&&` `\|\|` `??` `?.` and the compound assignments |
//! | 1 | `+` `-` `*` `/` `%` `&` `\|` `^` `!` `~` `?` `:` `=` `@` `<` `>` |

/// Every operator the scanner knows, longest first.
pub const OPERATORS: &[&str] = &[
    ">>>=", //
    "===", "!==", "**=", "<<=", ">>=", ">>>", "??=", "||=", "&&=", "...", //
    "<=", ">=", "==", "!=", "=>", "**", "++", "--", "<<", ">>", "&&", "||", "??", "?.", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", //
    "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", "@", "<", ">",
];

/// Single-character punctuation that separates expressions.
pub const DELIMITERS: &[char] = &[';', ',', '.'];

/// Returns the longest operator at the start of `rest`.
pub fn match_operator(rest: &str) -> Option<&'static str> {
    OPERATORS
        .iter()
        .copied()
        .filter(|op| rest.starts_with(op))
        // `a?.5:b` is a conditional, not optional chaining
        .find(|op| {
            *op != "?."
                || !rest
                    .as_bytes()
                    .get(2)
                    .is_some_and(|b| b.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_longest_first() {
        let lengths: Vec<usize> = OPERATORS.iter().map(|op| op.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(match_operator(">>>= 1"), Some(">>>="));
        assert_eq!(match_operator(">>> 1"), Some(">>>"));
        assert_eq!(match_operator("??= b"), Some("??="));
        assert_eq!(match_operator("=> x"), Some("=>"));
        assert_eq!(match_operator("=-1"), Some("="));
    }

    #[test]
    fn test_optional_chain_before_digit() {
        assert_eq!(match_operator("?.5:b"), Some("?"));
        assert_eq!(match_operator("?.x"), Some("?."));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(match_operator("#x"), None);
    }
}
