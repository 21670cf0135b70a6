use super::*;
use crate::values;

fn users() -> StatementBuilder {
    let mut b = StatementBuilder::new();
    b.add_table(["users"]);
    b
}

// ==================== Select ====================

#[test]
fn test_select_star() {
    let mut b = users();
    b.select_raw("*");
    assert_eq!(b.build().unwrap().sql(), "SELECT * FROM `users`");
}

#[test]
fn test_select_field_default_alias() {
    let mut b = users();
    b.select(["name"]).unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT `users`.`name` AS `users_name` FROM `users`"
    );
    assert!(stmt.params().is_empty());
}

#[test]
fn test_select_field_explicit_alias() {
    let mut b = users();
    b.select(["name n", "email"]).unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT `users`.`name` AS `n`, `users`.`email` AS `users_email` FROM `users`"
    );
}

#[test]
fn test_select_raw_is_ignored_when_fields_selected() {
    let mut b = users();
    b.select_raw("COUNT(*)").select(["id"]).unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT `users`.`id` AS `users_id` FROM `users`"
    );
}

#[test]
fn test_select_raw_expression() {
    let mut b = users();
    b.select_raw("COUNT(*)");
    assert_eq!(b.build().unwrap().sql(), "SELECT COUNT(*) FROM `users`");
}

#[test]
fn test_select_in_other_table() {
    let mut b = StatementBuilder::new();
    b.add_table(["users", "roles"])
        .select_in(2, ["title"])
        .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT `roles`.`title` AS `roles_title` FROM `users`, `roles`"
    );
}

#[test]
fn test_add_single_table_becomes_active() {
    let mut b = StatementBuilder::new();
    b.add_table(["a", "b"]).add_table(["c"]);
    b.select(["x"]).unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT `c`.`x` AS `c_x` FROM `a`, `b`, `c`"
    );
}

#[test]
fn test_set_table_out_of_range() {
    let mut b = users();
    b.set_table(3);
    let err = b.select(["x"]).unwrap_err();
    assert_eq!(err, BuildError::UnknownTable { index: 3, len: 1 });
    b.set_table(0);
    assert!(matches!(
        b.filter("a %i", "=", 1).unwrap_err(),
        BuildError::UnknownTable { index: 0, .. }
    ));
}

// ==================== Joins ====================

#[test]
fn test_join_excludes_joined_table_from_from_list() {
    let mut b = StatementBuilder::new();
    b.add_table(["users", "roles"])
        .join_by(1, "role_id", 2, "id", "left")
        .unwrap();
    b.select_raw("*");
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `users` LEFT JOIN `roles` ON `users`.`role_id` = `roles`.`id`"
    );
}

#[test]
fn test_join_side_and_kind() {
    let mut b = StatementBuilder::new();
    b.add_table(["a", "b", "c"])
        .join_with(1, "b_id", 2, "id", Some(JoinSide::Full), Some(JoinKind::Outer))
        .unwrap()
        .join_by(1, "c_id", 3, "id", "inner")
        .unwrap()
        .set_table(1)
        .select(["id"])
        .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT `a`.`id` AS `a_id` FROM `a` FULL OUTER JOIN `b` ON `a`.`b_id` = `b`.`id` \
         INNER JOIN `c` ON `a`.`c_id` = `c`.`id`"
    );
}

#[test]
fn test_join_unknown_word_adds_no_modifier() {
    let mut b = StatementBuilder::new();
    b.add_table(["a", "b"])
        .join_by(1, "x", 2, "y", "sideways")
        .unwrap();
    b.select_raw("*");
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `a` JOIN `b` ON `a`.`x` = `b`.`y`"
    );
}

// ==================== Filters ====================

#[test]
fn test_where_or() {
    let mut b = StatementBuilder::new();
    b.add_table(["t"]).select_raw("*");
    b.filter("age %i", ">=", 18)
        .unwrap()
        .or()
        .filter("age %i", "<", 13)
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT * FROM `t` WHERE `t`.`age` >= ? OR `t`.`age` < ?"
    );
    assert_eq!(
        stmt.params(),
        &[PreparedValue::Integer(18), PreparedValue::Integer(13)]
    );
}

#[test]
fn test_or_resets_after_one_predicate() {
    let mut b = users();
    b.select_raw("*");
    b.filter("a %i", "=", 1)
        .unwrap()
        .or()
        .filter("b %i", "=", 2)
        .unwrap()
        .filter("c %i", "=", 3)
        .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `users` WHERE `users`.`a` = ? OR `users`.`b` = ? AND `users`.`c` = ?"
    );
}

#[test]
fn test_brackets() {
    let mut b = users();
    b.select_raw("*");
    b.filter("active %b", "=", true)
        .unwrap()
        .open_bracket()
        .filter("a %i", "=", 1)
        .unwrap()
        .or()
        .filter("b %i", "=", 2)
        .unwrap()
        .close_bracket();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `users` WHERE `users`.`active` = ? AND (`users`.`a` = ? OR `users`.`b` = ?)"
    );
}

#[test]
fn test_open_bracket_before_first_predicate() {
    let mut b = users();
    b.select_raw("*");
    b.open_bracket()
        .filter("a %i", "=", 1)
        .unwrap()
        .filter("b %i", "=", 2)
        .unwrap()
        .close_bracket();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `users` WHERE (`users`.`a` = ? AND `users`.`b` = ?)"
    );
}

#[test]
fn test_null_checks_bind_nothing() {
    let mut b = users();
    b.select_raw("*");
    b.filter_unary("deleted_at %d", "isnull")
        .unwrap()
        .filter_unary("email %s", Op::IsNotNull)
        .unwrap()
        .filter("name %s", "like", "A%")
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT * FROM `users` WHERE `users`.`deleted_at` IS NULL \
         AND `users`.`email` IS NOT NULL AND `users`.`name` LIKE ?"
    );
    assert_eq!(
        stmt.params(),
        &[PreparedValue::FilteredString("A%".to_string())]
    );
}

#[test]
fn test_operator_mapping() {
    let mut b = users();
    b.select_raw("*");
    b.filter("a %i", "!=", 1)
        .unwrap()
        .filter("b %i", ">", 2)
        .unwrap()
        .filter("c %i", "<=", 3)
        .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT * FROM `users` WHERE `users`.`a` <> ? AND `users`.`b` > ? AND `users`.`c` <= ?"
    );
}

#[test]
fn test_filter_errors_leave_state_untouched() {
    let mut b = users();
    b.select_raw("*");
    assert!(b.filter("a %i", "~", 1).unwrap_err().is_format());
    assert!(b.filter("a", "=", 1).unwrap_err().is_format());
    assert!(b.filter("a %f", "=", "nope").unwrap_err().is_format());
    assert_eq!(b.build().unwrap().sql(), "SELECT * FROM `users`");
}

// ==================== Group / order / limit ====================

#[test]
fn test_group_order_limit() {
    let mut b = StatementBuilder::new();
    b.add_table(["orders", "users"])
        .set_table(1)
        .select_raw("COUNT(*)")
        .group_by("user_id")
        .unwrap()
        .group_by_in(2, "country")
        .unwrap()
        .order_by("created", "desc")
        .unwrap()
        .order_by_in(2, "name", Direction::Asc)
        .unwrap()
        .limit_range(20, 10);
    assert_eq!(
        b.build().unwrap().sql(),
        "SELECT COUNT(*) FROM `orders`, `users` GROUP BY `orders`.`user_id`, `users`.`country` \
         ORDER BY `orders`.`created` DESC, `users`.`name` ASC LIMIT 20, 10"
    );
}

#[test]
fn test_limit_last_call_wins() {
    let mut b = users();
    b.select_raw("*").limit_range(5, 5).limit(3);
    assert_eq!(b.build().unwrap().sql(), "SELECT * FROM `users` LIMIT 0, 3");
}

#[test]
fn test_direction_words() {
    assert_eq!(Direction::from("desc"), Direction::Desc);
    assert_eq!(Direction::from("asc"), Direction::Asc);
    assert_eq!(Direction::from("DESC"), Direction::Asc);
}

// ==================== Insert ====================

#[test]
fn test_insert_single_row() {
    let mut b = StatementBuilder::new();
    b.add_table(["t"])
        .set_insert_fields(["name %s", "age %i"])
        .unwrap()
        .insert(values!["Alice", 30])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO `t`(`name`, `age`) VALUES (?, ?)");
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::FilteredString("Alice".to_string()),
            PreparedValue::Integer(30)
        ]
    );
    assert_eq!(stmt.operation(), OperationKind::Insert);
}

#[test]
fn test_insert_batch_preserves_row_order() {
    let mut b = users();
    b.set_insert_fields(["name %v", "score %f"])
        .unwrap()
        .insert(values!["a", 1.5])
        .unwrap()
        .insert(values!["b", "2.5"])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO `users`(`name`, `score`) VALUES (?, ?), (?, ?)"
    );
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::RawString("a".to_string()),
            PreparedValue::Float(1.5),
            PreparedValue::RawString("b".to_string()),
            PreparedValue::Float(2.5),
        ]
    );
    assert_eq!(stmt.placeholder_count(), stmt.params().len());
}

#[test]
fn test_insert_targets_first_table() {
    let mut b = StatementBuilder::new();
    b.add_table(["first", "second"])
        .set_insert_fields(["a %i"])
        .unwrap()
        .insert([1])
        .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "INSERT INTO `first`(`a`) VALUES (?)"
    );
}

#[test]
fn test_insert_value_count_mismatch() {
    let mut b = users();
    b.set_insert_fields(["a %i", "b %i"]).unwrap();
    let err = b.insert([1]).unwrap_err();
    assert_eq!(
        err,
        BuildError::FieldCountMismatch {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn test_insert_without_rows_fails() {
    let mut b = users();
    b.set_insert_fields(["a %i"]).unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        BuildError::MissingValues(OperationKind::Insert)
    );
}

#[test]
fn test_insert_uses_configured_filter() {
    let config = BuilderConfig::new().string_filter(|s: &str| s.replace('<', ""));
    let mut b = StatementBuilder::with_config(config);
    b.add_table(["t"])
        .set_insert_fields(["s %s", "v %v"])
        .unwrap()
        .insert(values!["<b>", "<b>"])
        .unwrap();
    assert_eq!(
        b.build().unwrap().params(),
        &[
            PreparedValue::FilteredString("b>".to_string()),
            PreparedValue::RawString("<b>".to_string()),
        ]
    );
}

// ==================== Update / delete ====================

#[test]
fn test_update_requires_filter() {
    let mut b = users();
    b.set_update_fields(["name %s"])
        .unwrap()
        .update(["bob"])
        .unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        BuildError::UnsafeOperation(OperationKind::Update)
    );

    b.filter_id(7).unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE `users` SET `name` = ? WHERE `users`.`id` = ?"
    );
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::FilteredString("bob".to_string()),
            PreparedValue::Integer(7)
        ]
    );
}

#[test]
fn test_update_replaces_pending_row() {
    let mut b = users();
    b.set_update_fields(["a %i", "b %b"])
        .unwrap()
        .update(values![1, true])
        .unwrap()
        .update(values![2, "false"])
        .unwrap()
        .filter("id %i", "=", "9")
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE `users` SET `a` = ?, `b` = ? WHERE `users`.`id` = ?"
    );
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::Integer(2),
            PreparedValue::Boolean(false),
            PreparedValue::Integer(9)
        ]
    );
}

#[test]
fn test_delete_requires_filter() {
    let mut b = users();
    b.delete();
    assert!(b.build().unwrap_err().is_unsafe_operation());

    b.filter("name %s", "=", "x").unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "DELETE FROM `users` WHERE `users`.`name` = ?"
    );
}

#[test]
fn test_update_without_filter_is_unsafe_before_values_are_checked() {
    let mut b = users();
    b.set_update_fields(["a %i"]).unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        BuildError::UnsafeOperation(OperationKind::Update)
    );

    b.filter_id(1).unwrap();
    assert_eq!(
        b.build().unwrap_err(),
        BuildError::MissingValues(OperationKind::Update)
    );
}

#[test]
fn test_delete_by_id() {
    let mut b = users();
    b.delete_id(5).unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(stmt.sql(), "DELETE FROM `users` WHERE `users`.`id` = ?");
    assert_eq!(stmt.params(), &[PreparedValue::Integer(5)]);
    assert_eq!(stmt.operation(), OperationKind::Delete);
}

#[test]
fn test_lone_bracket_does_not_unlock_delete() {
    let mut b = users();
    b.delete().close_bracket();
    assert!(b.build().unwrap_err().is_unsafe_operation());
}

// ==================== Upsert ====================

#[test]
fn test_upsert_without_filter_is_insert() {
    let mut b = users();
    b.set_upsert_fields(["name %s"])
        .unwrap()
        .upsert(["ann"])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO `users`(`name`) VALUES (?)");
    assert_eq!(stmt.operation(), OperationKind::Upsert);
}

#[test]
fn test_upsert_with_filter_is_update() {
    let mut b = users();
    b.filter_id(3)
        .unwrap()
        .set_upsert_fields(["name %s"])
        .unwrap()
        .upsert(["ann"])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE `users` SET `name` = ? WHERE `users`.`id` = ?"
    );
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::FilteredString("ann".to_string()),
            PreparedValue::Integer(3)
        ]
    );
}

// ==================== Create ====================

#[test]
fn test_create_table() {
    let mut b = StatementBuilder::new();
    b.create_table_with(
        "people",
        [
            "name %s", "bio %t", "born %d", "ok %b", "w %f", "code %v", "n %i",
        ],
    )
    .unwrap();
    assert_eq!(
        b.build().unwrap().sql(),
        "CREATE TABLE IF NOT EXISTS `people`(`id` INTEGER PRIMARY KEY AUTO_INCREMENT, \
         `name` VARCHAR(255), `bio` TEXT, `born` INTEGER, `ok` BOOL, `w` FLOAT, \
         `code` VARCHAR(255), `n` INTEGER) DEFAULT CHARSET=utf8"
    );
}

#[test]
fn test_create_table_ignores_epilogue() {
    let mut b = StatementBuilder::new();
    b.create_table("t")
        .add_field("a %i")
        .unwrap()
        .add_fields(["b %s"])
        .unwrap()
        .set_charset("utf8mb4")
        .order_by("a", "asc")
        .unwrap()
        .limit(1);
    assert_eq!(
        b.build().unwrap().sql(),
        "CREATE TABLE IF NOT EXISTS `t`(`id` INTEGER PRIMARY KEY AUTO_INCREMENT, \
         `a` INTEGER, `b` VARCHAR(255)) DEFAULT CHARSET=utf8mb4"
    );
}

#[test]
fn test_create_table_bad_signature_is_atomic() {
    let mut b = StatementBuilder::new();
    assert!(b.create_table_with("t", ["a %i", "b"]).unwrap_err().is_format());
    assert_eq!(b.operation(), None);
}

// ==================== Lifecycle ====================

#[test]
fn test_operation_not_set() {
    let mut b = users();
    assert_eq!(b.build().unwrap_err(), BuildError::OperationNotSet);
}

#[test]
fn test_build_resets_state() {
    let mut b = users();
    b.select(["name"]).unwrap().filter("a %i", "=", 1).unwrap();
    b.build().unwrap();
    assert_eq!(b.operation(), None);
    assert_eq!(b.build().unwrap_err(), BuildError::OperationNotSet);

    b.add_table(["other"]).select_raw("*");
    assert_eq!(b.build().unwrap().sql(), "SELECT * FROM `other`");
}

#[test]
fn test_failed_build_keeps_state() {
    let mut b = users();
    b.delete();
    assert!(b.build().is_err());
    b.filter_id(1).unwrap();
    assert!(b.build().is_ok());
}

#[test]
fn test_reset_keeps_config() {
    let mut b = StatementBuilder::new();
    b.set_charset("latin1").create_table("x");
    b.reset();
    b.create_table("y");
    assert!(b.build().unwrap().sql().ends_with("DEFAULT CHARSET=latin1"));
}

#[test]
fn test_parameter_order_statement_then_filter() {
    let mut b = users();
    b.filter("id %i", "=", 1)
        .unwrap()
        .set_update_fields(["a %s", "b %i"])
        .unwrap()
        .update(values!["x", 2])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.params().iter().map(PreparedValue::semantic_type).collect::<Vec<_>>(),
        vec![
            crate::SemanticType::FilteredString,
            crate::SemanticType::Integer,
            crate::SemanticType::Integer
        ]
    );
    assert_eq!(stmt.placeholder_count(), 3);
}

// ==================== Inlining / execution ====================

#[test]
fn test_to_sql_inlines_values() {
    let mut b = users();
    b.select_raw("*");
    b.filter("name %s", "=", "O'Brien")
        .unwrap()
        .filter("age %i", ">", "21")
        .unwrap()
        .filter("vip %b", "=", true)
        .unwrap();
    assert_eq!(
        b.to_sql().unwrap(),
        r"SELECT * FROM `users` WHERE `users`.`name` = 'O\'Brien' AND `users`.`age` > 21 AND `users`.`vip` = 1"
    );
}

#[test]
fn test_to_sql_legacy_bool_literals() {
    let mut b = StatementBuilder::with_config(BuilderConfig::new().legacy_bool_literals(true));
    b.add_table(["t"]).select_raw("*");
    b.filter("ok %b", "=", false).unwrap();
    assert_eq!(
        b.to_sql().unwrap(),
        "SELECT * FROM `t` WHERE `t`.`ok` = 0'"
    );
}

#[test]
fn test_execute_without_executor() {
    let mut b = users();
    b.select_raw("*");
    assert_eq!(b.execute().unwrap_err(), BuildError::ConnectionNotSet);
    // Nothing was compiled, so the statement is still pending.
    assert_eq!(b.operation(), Some(OperationKind::Select));
}

#[test]
fn test_execute_hands_statement_to_executor() {
    use std::sync::{Arc, Mutex};

    let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let mut b = users();
    b.set_executor(move |sql: &str, params: &[PreparedValue]| -> BuildResult<u64> {
        sink.lock().unwrap().push((sql.to_string(), params.len()));
        Ok(1)
    });
    b.delete_id(4).unwrap();
    assert_eq!(b.execute().unwrap(), 1);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[("DELETE FROM `users` WHERE `users`.`id` = ?".to_string(), 1)]
    );
}

#[test]
fn test_executor_errors_propagate() {
    let mut b = users();
    b.set_executor(|_: &str, _: &[PreparedValue]| -> BuildResult<u64> {
        Err(BuildError::execution("boom"))
    });
    b.select_raw("*");
    assert_eq!(
        b.execute().unwrap_err(),
        BuildError::Execution("boom".to_string())
    );
}

// ==================== Nulls ====================

#[test]
fn test_insert_none_binds_null() {
    let mut b = users();
    b.set_insert_fields(["age %i", "vip %b", "nick %v"])
        .unwrap()
        .insert(values![None::<i32>, None::<bool>, None::<&str>])
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(
        stmt.params(),
        &[
            PreparedValue::Null(crate::SemanticType::Integer),
            PreparedValue::Null(crate::SemanticType::Boolean),
            PreparedValue::Null(crate::SemanticType::RawString),
        ]
    );
    assert_eq!(
        stmt.inline().unwrap(),
        "INSERT INTO `users`(`age`, `vip`, `nick`) VALUES (NULL, NULL, NULL)"
    );
}

#[test]
fn test_update_to_null_inlines_keyword() {
    let mut b = users();
    b.set_update_fields(["nick %s"])
        .unwrap()
        .update([Value::Null])
        .unwrap()
        .filter_id(2)
        .unwrap();
    assert_eq!(
        b.to_sql().unwrap(),
        "UPDATE `users` SET `nick` = NULL WHERE `users`.`id` = 2"
    );
}

// ==================== Quoted identifiers ====================

#[test]
fn test_question_mark_in_alias_is_not_a_placeholder() {
    let mut b = users();
    b.select(["name why?"])
        .unwrap()
        .filter("id %i", "=", 1)
        .unwrap();
    let stmt = b.build().unwrap();
    assert_eq!(stmt.placeholder_count(), stmt.params().len());
    assert_eq!(
        stmt.inline().unwrap(),
        "SELECT `users`.`name` AS `why?` FROM `users` WHERE `users`.`id` = 1"
    );
}

#[test]
fn test_non_finite_float_is_rejected() {
    let mut b = users();
    b.select_raw("*");
    assert!(b.filter("p %f", "=", "inf").unwrap_err().is_format());
    assert!(b.filter("p %f", "=", f64::NAN).unwrap_err().is_format());
    assert_eq!(b.to_sql().unwrap(), "SELECT * FROM `users`");
}
