//! Boolean conditions over entity fields.
//!
//! A [`Predicate`] is the only query shape that crosses the repository
//! boundary. Stores either evaluate it directly ([`Predicate::matches`]) or
//! translate it to their native mechanism. Evaluation follows SQL
//! three-valued logic so an in-memory store and a SQL store agree on rows
//! with `NULL` fields.

use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::ops::Not;
use uuid::Uuid;

use crate::Entity;

/// A column of an entity that predicates can refer to.
pub trait Field: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every field, in column order.
    const ALL: &'static [Self];

    /// The store column name.
    fn column(self) -> &'static str;
}

/// A scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Orders two values of the same kind. Values of different kinds, or
    /// `NULL`s, are incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{}", u8::from(*v)),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The SQL spelling of the operator.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Self::Ne, None) => true,
            (_, None) => false,
            (Self::Eq, Some(o)) => o == Ordering::Equal,
            (Self::Ne, Some(o)) => o != Ordering::Equal,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Le, Some(o)) => o != Ordering::Greater,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

/// A boolean condition over the fields `F` of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
    /// Matches every row.
    True,
    Compare { field: F, op: CompareOp, value: Value },
    IsNull(F),
    In(F, Vec<Value>),
    And(Vec<Predicate<F>>),
    Or(Vec<Predicate<F>>),
    Not(Box<Predicate<F>>),
}

impl<F: Field> Predicate<F> {
    fn compare(field: F, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn le(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Le, value)
    }

    #[must_use]
    pub fn gt(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn ge(field: F, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Ge, value)
    }

    #[must_use]
    pub const fn is_null(field: F) -> Self {
        Self::IsNull(field)
    }

    #[must_use]
    pub fn is_in<V: Into<Value>>(field: F, values: impl IntoIterator<Item = V>) -> Self {
        Self::In(field, values.into_iter().map(Into::into).collect())
    }

    /// Conjunction, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, p) | (p, Self::True) => p,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, q) => Self::And(vec![p, q]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), p) => {
                left.push(p);
                Self::Or(left)
            }
            (p, q) => Self::Or(vec![p, q]),
        }
    }

    /// Evaluates the predicate against an entity. `None` is SQL `UNKNOWN`.
    pub fn evaluate<E>(&self, entity: &E) -> Option<bool>
    where
        E: Entity<Field = F>,
    {
        match self {
            Self::True => Some(true),
            Self::Compare { field, op, value } => {
                let actual = entity.value_of(*field);
                if actual.is_null() || value.is_null() {
                    return None;
                }
                Some(op.holds(actual.compare(value)))
            }
            Self::IsNull(field) => Some(entity.value_of(*field).is_null()),
            Self::In(field, values) => {
                let actual = entity.value_of(*field);
                if actual.is_null() {
                    return None;
                }
                if values.iter().any(|v| actual.compare(v) == Some(Ordering::Equal)) {
                    Some(true)
                } else if values.iter().any(Value::is_null) {
                    None
                } else {
                    Some(false)
                }
            }
            Self::And(parts) => {
                let mut result = Some(true);
                for part in parts {
                    match part.evaluate(entity) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Self::Or(parts) => {
                let mut result = Some(false);
                for part in parts {
                    match part.evaluate(entity) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Self::Not(inner) => inner.evaluate(entity).map(|b| !b),
        }
    }

    /// True when the predicate holds for the entity (`UNKNOWN` does not
    /// match, as in a SQL `WHERE` clause).
    pub fn matches<E>(&self, entity: &E) -> bool
    where
        E: Entity<Field = F>,
    {
        self.evaluate(entity) == Some(true)
    }
}

impl<F> Not for Predicate<F> {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            p => Self::Not(Box::new(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RowField {
        Id,
        Level,
        Name,
    }

    impl Field for RowField {
        const ALL: &'static [Self] = &[Self::Id, Self::Level, Self::Name];

        fn column(self) -> &'static str {
            match self {
                Self::Id => "id",
                Self::Level => "level",
                Self::Name => "name",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Row {
        id: i32,
        level: Option<i16>,
        name: String,
    }

    impl Entity for Row {
        type Id = i32;
        type Field = RowField;

        const NAME: &'static str = "Row";
        const KEY: RowField = RowField::Id;
        const UNIQUE: &'static [(&'static str, RowField)] = &[];

        fn id(&self) -> i32 {
            self.id
        }

        fn value_of(&self, field: RowField) -> Value {
            match field {
                RowField::Id => self.id.into(),
                RowField::Level => self.level.into(),
                RowField::Name => self.name.clone().into(),
            }
        }
    }

    fn row(level: Option<i16>) -> Row {
        Row {
            id: 1,
            level,
            name: "Design Engineer".to_string(),
        }
    }

    #[test]
    fn test_comparisons() {
        let r = row(Some(3));
        assert!(Predicate::eq(RowField::Id, 1).matches(&r));
        assert!(Predicate::ne(RowField::Id, 2).matches(&r));
        assert!(Predicate::lt(RowField::Level, 4).matches(&r));
        assert!(Predicate::le(RowField::Level, 3).matches(&r));
        assert!(!Predicate::gt(RowField::Level, 3).matches(&r));
        assert!(Predicate::ge(RowField::Level, 3).matches(&r));
        assert!(Predicate::eq(RowField::Name, "Design Engineer").matches(&r));
    }

    #[test]
    fn test_null_comparisons_are_unknown() {
        let r = row(None);
        let p = Predicate::eq(RowField::Level, 1);
        assert_eq!(p.evaluate(&r), None);
        assert!(!p.matches(&r));
        // NOT UNKNOWN is still UNKNOWN
        assert!(!(!p).matches(&r));
        assert!(Predicate::is_null(RowField::Level).matches(&r));
    }

    #[test]
    fn test_three_valued_connectives() {
        let r = row(None);
        let unknown = Predicate::eq(RowField::Level, 1);
        let yes = Predicate::eq(RowField::Id, 1);
        let no = Predicate::eq(RowField::Id, 2);

        assert!(unknown.clone().or(yes.clone()).matches(&r));
        assert_eq!(unknown.clone().or(no.clone()).evaluate(&r), None);
        assert_eq!(unknown.clone().and(no).evaluate(&r), Some(false));
        assert_eq!(unknown.and(yes).evaluate(&r), None);
    }

    #[test]
    fn test_in_list() {
        let r = row(Some(2));
        assert!(Predicate::is_in(RowField::Level, [1_i16, 2]).matches(&r));
        assert!(!Predicate::is_in(RowField::Level, Vec::<i16>::new()).matches(&r));
        let with_null = Predicate::In(RowField::Level, vec![Value::Int(7), Value::Null]);
        assert_eq!(with_null.evaluate(&r), None);
    }

    #[test]
    fn test_builders_flatten() {
        let p = Predicate::eq(RowField::Id, 1)
            .and(Predicate::eq(RowField::Level, 2))
            .and(Predicate::eq(RowField::Name, "x"));
        assert!(matches!(p, Predicate::And(ref parts) if parts.len() == 3));

        let t = Predicate::True.and(Predicate::eq(RowField::Id, 1));
        assert_eq!(t, Predicate::eq(RowField::Id, 1));

        let double = !!Predicate::eq(RowField::Id, 1);
        assert_eq!(double, Predicate::eq(RowField::Id, 1));
    }
}
