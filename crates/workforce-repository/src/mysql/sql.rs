//! Predicate and statement rendering for MySQL.

use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, QueryBuilder};
use workforce_core::{Entity, Field, Predicate, Value, WorkforceResult};

/// An entity persisted in a MySQL table.
pub trait SqlEntity: Entity {
    /// Table name.
    const TABLE: &'static str;

    /// Raw row shape decoded by SQLx.
    type Row: for<'r> FromRow<'r, MySqlRow> + Send + Unpin;

    /// Converts a decoded row into the entity.
    ///
    /// # Errors
    /// `Internal` when a column holds a value the entity cannot represent.
    fn from_row(row: Self::Row) -> WorkforceResult<Self>;
}

fn column_list<F: Field>() -> String {
    F::ALL.iter().map(|f| f.column()).collect::<Vec<_>>().join(", ")
}

pub(crate) fn push_value(builder: &mut QueryBuilder<'_, MySql>, value: &Value) {
    match value {
        Value::Null => {
            builder.push_bind(None::<String>);
        }
        Value::Bool(b) => {
            builder.push_bind(*b);
        }
        Value::Int(i) => {
            builder.push_bind(*i);
        }
        Value::Text(s) => {
            builder.push_bind(s.clone());
        }
        Value::Date(d) => {
            builder.push_bind(*d);
        }
        Value::Timestamp(ts) => {
            builder.push_bind(*ts);
        }
        Value::Uuid(u) => {
            builder.push_bind(u.to_string());
        }
    }
}

/// Appends the predicate as a `WHERE` fragment with bound parameters.
pub(crate) fn push_predicate<F: Field>(builder: &mut QueryBuilder<'_, MySql>, predicate: &Predicate<F>) {
    match predicate {
        Predicate::True => {
            builder.push("1 = 1");
        }
        Predicate::Compare { field, op, value } => {
            builder.push(field.column()).push(" ").push(op.sql()).push(" ");
            push_value(builder, value);
        }
        Predicate::IsNull(field) => {
            builder.push(field.column()).push(" IS NULL");
        }
        Predicate::In(_, values) if values.is_empty() => {
            builder.push("1 = 0");
        }
        Predicate::In(field, values) => {
            builder.push(field.column()).push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, value);
            }
            builder.push(")");
        }
        Predicate::And(parts) => push_group(builder, parts, " AND ", "1 = 1"),
        Predicate::Or(parts) => push_group(builder, parts, " OR ", "1 = 0"),
        Predicate::Not(inner) => {
            builder.push("NOT (");
            push_predicate(builder, inner);
            builder.push(")");
        }
    }
}

fn push_group<F: Field>(
    builder: &mut QueryBuilder<'_, MySql>,
    parts: &[Predicate<F>],
    separator: &str,
    empty: &str,
) {
    if parts.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, part);
    }
    builder.push(")");
}

/// `SELECT <columns> FROM <table> WHERE <predicate> ORDER BY <key>`.
pub(crate) fn select<T: SqlEntity>(predicate: &Predicate<T::Field>) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE ",
        column_list::<T::Field>(),
        T::TABLE
    ));
    push_predicate(&mut builder, predicate);
    builder.push(" ORDER BY ").push(T::KEY.column());
    builder
}

pub(crate) fn insert<T: SqlEntity>(entity: &T) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        T::TABLE,
        column_list::<T::Field>()
    ));
    for (i, (_, value)) in entity.values().iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(")");
    builder
}

pub(crate) fn update<T: SqlEntity>(entity: &T) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
    let mut first = true;
    for (field, value) in entity.values() {
        if field == T::KEY {
            continue;
        }
        if !first {
            builder.push(", ");
        }
        first = false;
        builder.push(field.column()).push(" = ");
        push_value(&mut builder, &value);
    }
    push_key_filter::<T>(&mut builder, entity);
    builder
}

pub(crate) fn delete<T: SqlEntity>(entity: &T) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {}", T::TABLE));
    push_key_filter::<T>(&mut builder, entity);
    builder
}

fn push_key_filter<T: SqlEntity>(builder: &mut QueryBuilder<'_, MySql>, entity: &T) {
    builder.push(" WHERE ").push(T::KEY.column()).push(" = ");
    push_value(builder, &entity.value_of(T::KEY));
}
