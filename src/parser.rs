//! Textual fragment parsing using nom.
//!
//! The builder accepts a few things as text: comparison operators, join conditions
//! written as `"ue.id = user.id"`, and raw SQL fragments carrying `?` markers and
//! `{table}` placeholders. Everything here works on `&str` and never allocates an AST
//! larger than the fragment it was given.
//!
//! ```text
//! ue.enrolid   NOT LIKE   e.id
//! ─────┬────   ────┬───   ──┬─
//!      │           │        └── right operand (identifier, number, quoted literal)
//!      │           └── operator (longest match first)
//!      └── left identifier ([A-Za-z0-9_.{}])
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while1},
    character::complete::{anychar, char, multispace0, multispace1},
    combinator::{eof, map, recognize, value},
    multi::many0,
    sequence::{delimited, tuple},
    IResult,
};

use crate::ast::{JoinCondition, Operator};
use crate::error::{QueryError, QueryResult};

/// Parse a comparison operator token, case-insensitive and trimmed.
///
/// `!=` is accepted as an alias of `<>`. Anything else outside the recognized set is
/// rejected with the token as given.
pub fn parse_operator_token(token: &str) -> QueryResult<Operator> {
    let trimmed = token.trim();
    match tuple((parse_operator, eof))(trimmed) {
        Ok((_, (op, _))) => Ok(op),
        Err(_) => Err(QueryError::UnsupportedOperator(token.to_string())),
    }
}

/// Parse a textual join condition such as `"ue.enrolid = e.id"`.
pub fn parse_join_condition(text: &str) -> QueryResult<JoinCondition> {
    let input = text.trim();
    match parse_condition(input) {
        Ok(("", condition)) => Ok(condition),
        Ok((remaining, _)) => Err(QueryError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(QueryError::parse(
            input.len() - e.input.len(),
            format!("Invalid join condition '{}'", input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(QueryError::parse(
            input.len(),
            format!("Incomplete join condition '{}'", input),
        )),
    }
}

/// Replace every `?` marker outside quoted literals with `f(n)`, where `n` counts
/// markers from zero.
pub fn rewrite_markers(sql: &str, mut f: impl FnMut(usize) -> String) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut index = 0;
    for segment in segments(sql) {
        match segment {
            Segment::Marker => {
                out.push_str(&f(index));
                index += 1;
            }
            Segment::Table(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Segment::Literal(s) | Segment::Text(s) => out.push_str(s),
        }
    }
    out
}

/// Expand `{name}` table placeholders outside quoted literals to `prefix` + `name`.
pub fn substitute_tables(sql: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(sql.len() + prefix.len() * 4);
    for segment in segments(sql) {
        match segment {
            Segment::Table(name) => {
                out.push_str(prefix);
                out.push_str(name);
            }
            Segment::Marker => out.push('?'),
            Segment::Literal(s) | Segment::Text(s) => out.push_str(s),
        }
    }
    out
}

/// Count `?` markers outside quoted literals.
pub fn count_markers(sql: &str) -> usize {
    segments(sql)
        .into_iter()
        .filter(|s| matches!(s, Segment::Marker))
        .count()
}

/// Collapse whitespace runs outside quoted literals to one space and trim the ends.
pub fn collapse_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for segment in segments(sql) {
        match segment {
            Segment::Text(s) => {
                for c in s.chars() {
                    if !c.is_whitespace() {
                        out.push(c);
                    } else if !out.ends_with(' ') {
                        out.push(' ');
                    }
                }
            }
            Segment::Literal(s) => out.push_str(s),
            Segment::Marker => out.push('?'),
            Segment::Table(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
    }
    out.trim().to_string()
}

// ==================== Operators ====================

fn parse_operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(
            Operator::NotILike,
            recognize(tuple((tag_no_case("not"), multispace1, tag_no_case("ilike")))),
        ),
        value(
            Operator::NotLike,
            recognize(tuple((tag_no_case("not"), multispace1, tag_no_case("like")))),
        ),
        value(Operator::ILike, tag_no_case("ilike")),
        value(Operator::Like, tag_no_case("like")),
        value(Operator::Ne, tag("<>")),
        value(Operator::Ne, tag("!=")),
        value(Operator::Gte, tag(">=")),
        value(Operator::Lte, tag("<=")),
        value(Operator::Eq, tag("=")),
        value(Operator::Gt, tag(">")),
        value(Operator::Lt, tag("<")),
    ))(input)
}

// ==================== Join conditions ====================

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '{' | '}'))(input)
}

/// Right operand: an identifier, a number or a quoted literal.
fn parse_operand(input: &str) -> IResult<&str, &str> {
    alt((
        parse_quoted,
        take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '{' | '}' | '-')),
    ))(input)
}

fn parse_condition(input: &str) -> IResult<&str, JoinCondition> {
    let (input, left) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, right) = parse_operand(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        JoinCondition {
            left: left.to_string(),
            op,
            right: right.to_string(),
        },
    ))
}

// ==================== Fragment scanning ====================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment<'a> {
    /// Single-quoted literal, quotes included.
    Literal(&'a str),
    /// `?` marker.
    Marker,
    /// `{name}` placeholder, braces stripped.
    Table(&'a str),
    Text(&'a str),
}

/// `'...'` with `''` as the escaped quote.
fn parse_quoted(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('\''),
        many0(alt((tag("''"), is_not("'")))),
        char('\''),
    ))(input)
}

fn parse_table_placeholder(input: &str) -> IResult<&str, &str> {
    delimited(
        char('{'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        char('}'),
    )(input)
}

fn parse_segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(parse_quoted, Segment::Literal),
        map(parse_table_placeholder, Segment::Table),
        value(Segment::Marker, char('?')),
        map(is_not("'?{"), Segment::Text),
        // stray brace or unterminated quote
        map(recognize(anychar), Segment::Text),
    ))(input)
}

fn segments(sql: &str) -> Vec<Segment<'_>> {
    match many0(parse_segment)(sql) {
        Ok((_, segments)) => segments,
        Err(_) => vec![Segment::Text(sql)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(parse_operator_token("=").unwrap(), Operator::Eq);
        assert_eq!(parse_operator_token(" <> ").unwrap(), Operator::Ne);
        assert_eq!(parse_operator_token("!=").unwrap(), Operator::Ne);
        assert_eq!(parse_operator_token("like").unwrap(), Operator::Like);
        assert_eq!(parse_operator_token("Not  ILike").unwrap(), Operator::NotILike);
        assert_eq!(parse_operator_token(">=").unwrap(), Operator::Gte);
    }

    #[test]
    fn test_operator_rejects_unknown() {
        for bad in ["=~", "", "==", "LIKES", "in"] {
            let err = parse_operator_token(bad).unwrap_err();
            match err {
                QueryError::UnsupportedOperator(token) => assert_eq!(token, bad),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_join_condition() {
        let c = parse_join_condition("ue.enrolid = e.id").unwrap();
        assert_eq!(c.left, "ue.enrolid");
        assert_eq!(c.op, Operator::Eq);
        assert_eq!(c.right, "e.id");

        let c = parse_join_condition("a.name not like b.name").unwrap();
        assert_eq!(c.op, Operator::NotLike);

        let c = parse_join_condition("e.status<>0").unwrap();
        assert_eq!(c.op, Operator::Ne);
        assert_eq!(c.right, "0");

        let c = parse_join_condition("r.shortname = 'student'").unwrap();
        assert_eq!(c.right, "'student'");
    }

    #[test]
    fn test_join_condition_errors() {
        assert!(parse_join_condition("AND").is_err());
        assert!(parse_join_condition("a = b extra").is_err());
        assert!(parse_join_condition("a =~ b").is_err());
    }

    #[test]
    fn test_rewrite_markers_skips_literals() {
        let out = rewrite_markers("a = ? AND b = '?' AND c = ?", |i| format!("${}", i + 1));
        assert_eq!(out, "a = $1 AND b = '?' AND c = $2");
        assert_eq!(count_markers("x IN (?, ?) OR y = 'it''s ?'"), 2);
    }

    #[test]
    fn test_substitute_tables() {
        assert_eq!(
            substitute_tables("SELECT * FROM {user} u JOIN {user_enrolments} ue", "mdl_"),
            "SELECT * FROM mdl_user u JOIN mdl_user_enrolments ue"
        );
        assert_eq!(
            substitute_tables("WHERE note = '{user}' AND x = ?", "mdl_"),
            "WHERE note = '{user}' AND x = ?"
        );
        assert_eq!(substitute_tables("json -> '{' { x", "p_"), "json -> '{' { x");
    }

    #[test]
    fn test_collapse_whitespace_keeps_literals() {
        assert_eq!(collapse_whitespace("  a   b \n c "), "a b c");
        assert_eq!(
            collapse_whitespace("ON  r.shortname =  'two  words'  AND {t}.x  = ?"),
            "ON r.shortname = 'two  words' AND {t}.x = ?"
        );
    }

    #[test]
    fn test_unterminated_quote_passes_through() {
        assert_eq!(rewrite_markers("a = 'oops ?", |_| "$1".into()), "a = 'oops $1");
    }
}
