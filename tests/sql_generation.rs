use pretty_assertions::assert_eq;
use sqlweave::ast::builders::{eq, is_null};
use sqlweave::prelude::*;

#[test]
fn test_select_star_from_placeholder() {
    let q = sqlweave::table("user");
    assert_eq!(q.to_sql(), "SELECT * FROM {user}");
    assert_eq!(q.compile().params, Vec::<Value>::new());
}

#[test]
fn test_simple_where() {
    let mut q = sqlweave::table("user");
    q.select("username").where_("suspended", "=", 1).unwrap();
    assert_eq!(q.to_sql(), "SELECT username FROM {user} WHERE suspended = 1");
}

#[test]
fn test_and_only_in_call_order() {
    let mut q = sqlweave::table("user");
    q.where_("deleted", "=", 0)
        .unwrap()
        .where_("suspended", "<>", 1)
        .unwrap()
        .where_("firstaccess", ">", 0)
        .unwrap();
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user} WHERE deleted = 0 AND suspended <> 1 AND firstaccess > 0"
    );
}

#[test]
fn test_or_first_behaves_like_and() {
    let mut or_first = sqlweave::table("user");
    or_first.or_where("deleted", "=", 0).unwrap();
    let mut and_first = sqlweave::table("user");
    and_first.where_("deleted", "=", 0).unwrap();
    assert_eq!(or_first.compile(), and_first.compile());
}

#[test]
fn test_or_chain_is_one_group() {
    let mut q = sqlweave::table("user");
    q.where_("auth", "=", "manual")
        .unwrap()
        .or_where("auth", "=", "ldap")
        .unwrap()
        .or_where("auth", "=", "oauth2")
        .unwrap();
    assert_eq!(
        q.conditions().predicates(),
        &[Predicate::OrGroup(vec![
            eq("auth", "manual"),
            eq("auth", "ldap"),
            eq("auth", "oauth2"),
        ])]
    );
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user} WHERE auth = 'manual' OR auth = 'ldap' OR auth = 'oauth2'"
    );
}

#[test]
fn test_or_group_parenthesized_among_ands() {
    let mut q = sqlweave::table("user");
    q.where_("deleted", "=", 0)
        .unwrap()
        .where_("suspended", "=", 0)
        .unwrap()
        .or_where_null("suspended")
        .where_("confirmed", "=", 1)
        .unwrap();
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user} WHERE deleted = 0 AND (suspended = 0 OR suspended IS NULL) AND confirmed = 1"
    );
}

#[test]
fn test_select_as() {
    let mut q = sqlweave::table("user");
    q.select_as("username", "uname");
    assert_eq!(q.to_sql(), "SELECT (username) AS uname FROM {user}");
}

#[test]
fn test_left_join() {
    let mut q = sqlweave::table("user");
    q.left_join("user_enrolments", [("ue.id", "=", "user.id")], "ue")
        .unwrap();
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user} LEFT JOIN {user_enrolments} ue ON ue.id = user.id"
    );
}

#[test]
fn test_join_logic_tokens() {
    let mut q = Query::table_as("user", "u");
    let conditions: Vec<ConditionItem> =
        vec![("a", "=", "b").into(), "OR".into(), ("c", "=", "d").into()];
    q.join("t", conditions, "t").unwrap();
    assert_eq!(q.to_sql(), "SELECT * FROM {user} u INNER JOIN {t} t ON a = b OR c = d");
}

#[test]
fn test_join_subquery() {
    let mut latest = sqlweave::table("logstore_standard_log");
    latest
        .select("userid")
        .select_max("timecreated", Some("lastseen"))
        .group_by(["userid"]);

    let mut q = Query::table_as("user", "u");
    q.select("u.id")
        .select_column("l", "lastseen", None)
        .join_sub(JoinKind::Left, latest, "l.userid = u.id", "l")
        .unwrap();
    assert_eq!(
        q.to_sql(),
        "SELECT u.id, l.lastseen FROM {user} u LEFT JOIN (SELECT userid, MAX(timecreated) lastseen FROM {logstore_standard_log} GROUP BY userid) l ON l.userid = u.id"
    );
}

#[test]
fn test_unsupported_operator_rejected_at_call() {
    let mut q = sqlweave::table("user");
    let err = q.where_("id", "=~", 1).unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedOperator(ref op) if op == "=~"));
    assert_eq!(q.to_sql(), "SELECT * FROM {user}");
}

#[test]
fn test_cross_join_conditions_rejected() {
    let mut q = sqlweave::table("user");
    let err = q
        .join_as(JoinKind::Cross, "course", ("a", "=", "b"), "c")
        .unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedJoin(_)));
    q.cross_join("course", "c");
    assert_eq!(q.to_sql(), "SELECT * FROM {user} CROSS JOIN {course} c");
}

#[test]
fn test_clear_order() {
    let mut q = sqlweave::table("user");
    q.order_asc(["lastname"]).order_asc(["firstname"]);
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user} ORDER BY lastname ASC, firstname ASC"
    );
    q.clear_order();
    assert_eq!(q.to_sql(), "SELECT * FROM {user}");
    assert_eq!(q.ordering().to_sql(), "");
}

#[test]
fn test_full_query_with_grouping() {
    let mut q = Query::table_as("user", "u");
    q.select("u.id")
        .select_count(Some("ue.id"), Some("enrolments"))
        .join("user_enrolments", "ue.userid = u.id", "ue")
        .unwrap()
        .where_("u.deleted", "=", 0)
        .unwrap()
        .group_by(["u.id"])
        .having("COUNT(ue.id)", ">=", 2)
        .unwrap()
        .order_desc(["enrolments"]);

    let compiled = q.compile_with(Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT u.id, COUNT(ue.id) enrolments FROM {user} u INNER JOIN {user_enrolments} ue ON ue.userid = u.id WHERE u.deleted = $1 GROUP BY u.id HAVING COUNT(ue.id) >= $2 ORDER BY enrolments DESC"
    );
    assert_eq!(compiled.params, vec![Value::Int(0), Value::Int(2)]);
}

#[test]
fn test_compile_is_idempotent() {
    let mut q = sqlweave::table("course");
    q.where_in("category", [1, 2, 3])
        .or_where_predicate(is_null("category"));
    let first = q.compile_with(Dialect::SqlServer);
    let second = q.compile_with(Dialect::SqlServer);
    assert_eq!(first, second);
    assert_eq!(
        first.sql,
        "SELECT * FROM {course} WHERE category IN (@p1, @p2, @p3) OR category IS NULL"
    );
}

#[test]
fn test_like_per_dialect() {
    let mut q = sqlweave::table("user");
    q.where_("firstname", "ILIKE", "pa%").unwrap();
    assert_eq!(
        q.compile_with(Dialect::Postgres).sql,
        "SELECT * FROM {user} WHERE firstname ILIKE $1 ESCAPE '\\'"
    );
    assert_eq!(
        q.compile_with(Dialect::MySql).sql,
        "SELECT * FROM {user} WHERE firstname LIKE ? COLLATE utf8mb4_0900_as_ci ESCAPE '\\\\'"
    );
    assert_eq!(
        q.compile_with(Dialect::SqlServer).sql,
        "SELECT * FROM {user} WHERE firstname COLLATE Latin1_General_CI_AS LIKE @p1 ESCAPE '\\'"
    );
}

#[test]
fn test_active_window() {
    let mut q = sqlweave::table("user_enrolments");
    q.where_active_at("timestart", "timeend", 1_700_000_000);
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM {user_enrolments} WHERE (timestart IS NULL OR timestart <= 1700000000) AND (timeend IS NULL OR timeend >= 1700000000)"
    );
}

#[test]
fn test_values_source() {
    let q = sqlweave::from_values(
        vec![
            vec![Value::Int(1), Value::from("a")],
            vec![Value::Int(2), Value::from("b")],
        ],
        Some(vec!["id".to_string(), "name".to_string()]),
    );
    let compiled = q.compile_with(Dialect::Postgres);
    assert_eq!(
        compiled.sql,
        "SELECT * FROM VALUES(\n(($1), ($2)),\n(($3), ($4))\n) AS custom_value_table(id,name)"
    );
    assert_eq!(compiled.params.len(), 4);
}

#[test]
fn test_query_serde_round_trip() {
    let mut q = sqlweave::table("user");
    q.select("id").where_("deleted", "=", 0).unwrap();
    let json = serde_json::to_string(&q).unwrap();
    let back: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(back.compile(), q.compile());
}

#[test]
fn test_select_all_resets_projection() {
    let mut q = sqlweave::table("user");
    q.select("username").select_all();
    assert_eq!(q.to_sql(), "SELECT * FROM {user}");
    q.select("email");
    assert_eq!(q.to_sql(), "SELECT *, email FROM {user}");
}

#[test]
fn test_join_keeps_literal_whitespace() {
    let mut inner = sqlweave::table("user");
    inner.where_("name", "=", "a  b").unwrap();

    let mut q = Query::table_as("course", "c");
    q.join("role", "r.shortname = 'two  words'", "r")
        .unwrap()
        .join_sub(JoinKind::Left, inner, "x.id = c.id", "x")
        .unwrap();
    let sql = q.to_sql();
    assert!(sql.contains("ON r.shortname = 'two  words'"), "{}", sql);
    assert!(sql.contains("WHERE name = 'a  b') x"), "{}", sql);

    let compiled = q.compile_with(Dialect::Postgres);
    assert_eq!(compiled.params, vec![Value::from("a  b")]);
}
