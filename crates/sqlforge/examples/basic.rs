//! Basic sqlforge usage
//!
//! Run with: cargo run --example basic -p sqlforge

use sqlforge::{BuildError, BuilderConfig, PreparedValue, StatementBuilder, values};

fn main() -> Result<(), BuildError> {
    let config = BuilderConfig::new().string_filter(|s: &str| s.trim().to_string());
    let mut b = StatementBuilder::with_config(config);

    // Every statement runs through a logging executor.
    b.set_executor(
        |sql: &str, params: &[PreparedValue]| -> Result<u64, BuildError> {
            println!("  exec: {sql}");
            println!("  params: {params:?}");
            Ok(1)
        },
    );

    println!("=== CREATE TABLE ===");
    b.create_table_with(
        "products",
        ["name %s", "price %f", "in_stock %b", "added %d"],
    )?;
    b.execute()?;

    println!("\n=== INSERT (batch) ===");
    b.add_table(["products"])
        .set_insert_fields(["name %s", "price %f", "in_stock %b", "added %d"])?
        .insert(values!["  Widget  ", 9.99, true, "01.06.2024"])?
        .insert(values!["Gadget", "19.5", false, "15.06.2024"])?;
    b.execute()?;

    println!("\n=== SELECT ===");
    b.add_table(["products"])
        .select(["name", "price cost"])?
        .filter("price %f", ">", 5.0)?
        .or()
        .filter("in_stock %b", "=", true)?
        .order_by("price", "desc")?
        .limit(10);
    let stmt = b.build()?;
    println!("  sql: {}", stmt.sql());
    println!("  inlined: {}", stmt.inline()?);

    println!("\n=== UPDATE without filter ===");
    b.add_table(["products"])
        .set_update_fields(["in_stock %b"])?
        .update([false])?;
    match b.build() {
        Err(e) => println!("  refused: {e}"),
        Ok(stmt) => println!("  unexpected: {stmt}"),
    }

    println!("\n=== UPDATE with filter ===");
    b.filter("name %s", "=", "Gadget")?;
    println!("  {}", b.to_sql()?);

    println!("\n=== DELETE ===");
    b.add_table(["products"]).delete_id(2)?;
    let affected = b.execute()?;
    println!("  affected: {affected}");

    Ok(())
}
