//! Parameterized SQL statements composed from column lists.
//!
//! Builders render `$n` placeholders in the order values are pushed, so the
//! bind list of a [`Statement`] always lines up with its SQL text. The public
//! base of image URLs is bound like any other value and never spliced in.

use std::fmt::Write;

use bigdecimal::BigDecimal;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{Bool, Integer, Nullable, Numeric, Text};
use uuid::Uuid;

use crate::domain::entity::Projection;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Uuid(Uuid),
    OptionalUuid(Option<Uuid>),
    Text(String),
    OptionalText(Option<String>),
    Integer(i32),
    Numeric(BigDecimal),
    Bool(bool),
}

impl SqlValue {
    fn bind<'f>(self, query: BoxedSqlQuery<'f, Pg, SqlQuery>) -> BoxedSqlQuery<'f, Pg, SqlQuery> {
        match self {
            SqlValue::Uuid(v) => query.bind::<diesel::sql_types::Uuid, _>(v),
            SqlValue::OptionalUuid(v) => query.bind::<Nullable<diesel::sql_types::Uuid>, _>(v),
            SqlValue::Text(v) => query.bind::<Text, _>(v),
            SqlValue::OptionalText(v) => query.bind::<Nullable<Text>, _>(v),
            SqlValue::Integer(v) => query.bind::<Integer, _>(v),
            SqlValue::Numeric(v) => query.bind::<Numeric, _>(v),
            SqlValue::Bool(v) => query.bind::<Bool, _>(v),
        }
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Option<Uuid>> for SqlValue {
    fn from(v: Option<Uuid>) -> Self {
        SqlValue::OptionalUuid(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::OptionalText(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<BigDecimal> for SqlValue {
    fn from(v: BigDecimal) -> Self {
        SqlValue::Numeric(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Statement {
    pub fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        let Statement { sql, binds } = self;
        binds
            .into_iter()
            .fold(diesel::sql_query(sql).into_boxed(), |query, value| {
                value.bind(query)
            })
    }
}

#[derive(Default)]
struct Writer {
    sql: String,
    binds: Vec<SqlValue>,
}

impl Writer {
    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn bind(&mut self, value: SqlValue) {
        self.binds.push(value);
        let _ = write!(self.sql, "${}", self.binds.len());
    }

    fn projection(&mut self, columns: &[Projection], public_base: &str) {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match *column {
                Projection::Column(name) => self.push(name),
                Projection::ImageUrl(name) => {
                    let _ = write!(
                        self.sql,
                        "CASE WHEN NULLIF({name}, '') IS NOT NULL THEN FORMAT('%s/%s', "
                    );
                    self.bind(SqlValue::Text(public_base.to_string()));
                    let _ = write!(self.sql, "::text, {name}) ELSE NULL END AS {name}");
                }
            }
        }
    }

    fn filter(&mut self, filter: Vec<(&str, SqlValue)>) {
        for (i, (column, value)) in filter.into_iter().enumerate() {
            self.push(if i == 0 { " WHERE " } else { " AND " });
            self.push(column);
            self.push(" = ");
            self.bind(value);
        }
    }

    fn returning(&mut self, columns: &[Projection], public_base: &str) {
        if !columns.is_empty() {
            self.push(" RETURNING ");
            self.projection(columns, public_base);
        }
    }

    fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            binds: self.binds,
        }
    }
}

pub struct Select<'a> {
    table: &'a str,
    columns: Vec<Projection>,
    public_base: &'a str,
    filter: Vec<(&'a str, SqlValue)>,
}

impl<'a> Select<'a> {
    pub fn from(table: &'a str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            public_base: "",
            filter: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Projection>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn public_base(mut self, base: &'a str) -> Self {
        self.public_base = base;
        self
    }

    pub fn where_eq(mut self, column: &'a str, value: impl Into<SqlValue>) -> Self {
        self.filter.push((column, value.into()));
        self
    }

    pub fn build(self) -> Statement {
        let mut w = Writer::default();
        w.push("SELECT ");
        w.projection(&self.columns, self.public_base);
        w.push(" FROM ");
        w.push(self.table);
        w.filter(self.filter);
        w.finish()
    }
}

pub struct Insert<'a> {
    table: &'a str,
    values: Vec<(&'a str, SqlValue)>,
    returning: Vec<Projection>,
    public_base: &'a str,
}

impl<'a> Insert<'a> {
    pub fn into(table: &'a str) -> Self {
        Self {
            table,
            values: Vec::new(),
            returning: Vec::new(),
            public_base: "",
        }
    }

    pub fn value(mut self, column: &'a str, value: impl Into<SqlValue>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    pub fn values(mut self, values: impl IntoIterator<Item = (&'a str, SqlValue)>) -> Self {
        self.values.extend(values);
        self
    }

    pub fn returning(mut self, columns: impl IntoIterator<Item = Projection>) -> Self {
        self.returning.extend(columns);
        self
    }

    pub fn public_base(mut self, base: &'a str) -> Self {
        self.public_base = base;
        self
    }

    pub fn build(self) -> Statement {
        let mut w = Writer::default();
        w.push("INSERT INTO ");
        w.push(self.table);
        if self.values.is_empty() {
            w.push(" DEFAULT VALUES");
        } else {
            let columns: Vec<&str> = self.values.iter().map(|(c, _)| *c).collect();
            w.push(" (");
            w.push(&columns.join(", "));
            w.push(") VALUES (");
            for (i, (_, value)) in self.values.into_iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.bind(value);
            }
            w.push(")");
        }
        w.returning(&self.returning, self.public_base);
        w.finish()
    }
}

enum Assignment<'a> {
    Value(&'a str, SqlValue),
    Now(&'a str),
}

pub struct Update<'a> {
    table: &'a str,
    assignments: Vec<Assignment<'a>>,
    filter: Vec<(&'a str, SqlValue)>,
    returning: Vec<Projection>,
    public_base: &'a str,
}

impl<'a> Update<'a> {
    pub fn table(table: &'a str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            filter: Vec::new(),
            returning: Vec::new(),
            public_base: "",
        }
    }

    pub fn set(mut self, column: &'a str, value: impl Into<SqlValue>) -> Self {
        self.assignments.push(Assignment::Value(column, value.into()));
        self
    }

    pub fn set_now(mut self, column: &'a str) -> Self {
        self.assignments.push(Assignment::Now(column));
        self
    }

    pub fn where_eq(mut self, column: &'a str, value: impl Into<SqlValue>) -> Self {
        self.filter.push((column, value.into()));
        self
    }

    pub fn returning(mut self, columns: impl IntoIterator<Item = Projection>) -> Self {
        self.returning.extend(columns);
        self
    }

    pub fn public_base(mut self, base: &'a str) -> Self {
        self.public_base = base;
        self
    }

    pub fn build(self) -> Statement {
        let mut w = Writer::default();
        w.push("UPDATE ");
        w.push(self.table);
        w.push(" SET ");
        for (i, assignment) in self.assignments.into_iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            match assignment {
                Assignment::Value(column, value) => {
                    w.push(column);
                    w.push(" = ");
                    w.bind(value);
                }
                Assignment::Now(column) => {
                    w.push(column);
                    w.push(" = NOW()");
                }
            }
        }
        w.filter(self.filter);
        w.returning(&self.returning, self.public_base);
        w.finish()
    }
}

pub struct Delete<'a> {
    table: &'a str,
    filter: Vec<(&'a str, SqlValue)>,
    returning: Vec<Projection>,
}

impl<'a> Delete<'a> {
    pub fn from(table: &'a str) -> Self {
        Self {
            table,
            filter: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub fn where_eq(mut self, column: &'a str, value: impl Into<SqlValue>) -> Self {
        self.filter.push((column, value.into()));
        self
    }

    pub fn returning(mut self, columns: impl IntoIterator<Item = Projection>) -> Self {
        self.returning.extend(columns);
        self
    }

    pub fn build(self) -> Statement {
        let mut w = Writer::default();
        w.push("DELETE FROM ");
        w.push(self.table);
        w.filter(self.filter);
        w.returning(&self.returning, "");
        w.finish()
    }
}
