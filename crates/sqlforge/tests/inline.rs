//! Inlined SQL output.

use sqlforge::{BuilderConfig, Inliner, PreparedValue, StatementBuilder, escape_string, values};

#[test]
fn injection_attempt_stays_inside_literal() {
    let mut b = StatementBuilder::new();
    b.add_table(["users"])
        .select_raw("*")
        .filter("name %v", "=", "x' OR '1'='1")
        .unwrap();
    assert_eq!(
        b.to_sql().unwrap(),
        r"SELECT * FROM `users` WHERE `users`.`name` = 'x\' OR \'1\'=\'1'"
    );
}

#[test]
fn inlined_insert_renders_every_type() {
    let mut b = StatementBuilder::new();
    b.add_table(["t"])
        .set_insert_fields(["s %s", "n %i", "ok %b", "w %f", "d %d"])
        .unwrap()
        .insert(values![r"a\b", "12", false, 2.5, 86_400])
        .unwrap();
    assert_eq!(
        b.to_sql().unwrap(),
        r"INSERT INTO `t`(`s`, `n`, `ok`, `w`, `d`) VALUES ('a\\b', 12, 0, 2.5, 86400)"
    );
}

#[test]
fn to_sql_resets_the_builder() {
    let mut b = StatementBuilder::new();
    b.add_table(["t"]).select_raw("*");
    b.to_sql().unwrap();
    assert!(b.to_sql().is_err());
}

#[test]
fn legacy_bool_literals_are_opt_in() {
    let build = |config: BuilderConfig| {
        let mut b = StatementBuilder::with_config(config);
        b.add_table(["t"])
            .set_update_fields(["ok %b"])
            .unwrap()
            .update([true])
            .unwrap()
            .filter_id(1)
            .unwrap();
        b.to_sql().unwrap()
    };
    assert_eq!(
        build(BuilderConfig::new()),
        "UPDATE `t` SET `ok` = 1 WHERE `t`.`id` = 1"
    );
    assert_eq!(
        build(BuilderConfig::new().legacy_bool_literals(true)),
        "UPDATE `t` SET `ok` = 1' WHERE `t`.`id` = 1"
    );
}

#[test]
fn compiled_statement_inline_matches_to_sql() {
    let make = || {
        let mut b = StatementBuilder::new();
        b.add_table(["t"])
            .select(["a"])
            .unwrap()
            .filter("a %s", "=", "why?")
            .unwrap();
        b
    };
    let stmt = make().build().unwrap();
    assert_eq!(stmt.inline().unwrap(), make().to_sql().unwrap());
    assert!(stmt.inline().unwrap().ends_with("= 'why?'"));
}

#[test]
fn standalone_inliner() {
    let sql = Inliner::new()
        .inline(
            "SELECT ? , ?",
            &[
                PreparedValue::RawString(escape_string("'")),
                PreparedValue::Float(0.25),
            ],
        )
        .unwrap();
    assert_eq!(sql, r"SELECT '\\\'' , 0.25");
}
