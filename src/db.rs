//! The SQLite implementation of [AnalysisStore] and the database schema.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{
    AnalysisStore, Category, CostRecord, DateRange, DeepCostRow, Error, GroupColumn, LabelCost,
    PieColumn, SegmentKind, UserID,
};

/// Create the tables for income and every category, if they do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    for table in ["income", "bills", "funds"] {
        create_table(table, &[], &transaction)?;
    }

    for table in ["food", "general"] {
        create_table(table, &["category", "shop"], &transaction)?;
    }

    create_table("holiday", &["holiday", "shop"], &transaction)?;
    create_table("social", &["society", "shop"], &transaction)?;

    transaction.commit()?;

    Ok(())
}

fn create_table(
    table: &str,
    extra_columns: &[&str],
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    let extra_columns: String = extra_columns
        .iter()
        .map(|column| format!("{column} TEXT NOT NULL DEFAULT '',\n"))
        .collect();

    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            uid INTEGER NOT NULL,
            date TEXT NOT NULL,
            item TEXT NOT NULL,
            {extra_columns}
            cost INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_uid_date ON {table}(uid, date);"
    ))
}

/// A record to insert into a category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord<'a> {
    /// The user the record belongs to.
    pub user_id: UserID,
    /// The day of the transaction.
    pub date: Date,
    /// The item bought.
    pub item: &'a str,
    /// The sub-category, holiday or society, for categories that have one.
    pub sub_category: &'a str,
    /// The shop, for categories that have one.
    pub shop: &'a str,
    /// The cost in minor currency units.
    pub cost: i64,
}

/// Insert `record` into the table for `category`.
///
/// Fields the category does not have are ignored.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn insert_record(
    category: Category,
    record: &NewRecord,
    connection: &Connection,
) -> Result<(), Error> {
    let table = category.table_name();

    match sub_category_column(category) {
        Some(sub_category) => connection.execute(
            &format!(
                "INSERT INTO {table} (uid, date, item, {}, shop, cost)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                sub_category.as_sql()
            ),
            params![
                record.user_id.as_i64(),
                record.date,
                record.item,
                record.sub_category,
                record.shop,
                record.cost
            ],
        )?,
        None => connection.execute(
            &format!("INSERT INTO {table} (uid, date, item, cost) VALUES (?1, ?2, ?3, ?4)"),
            params![record.user_id.as_i64(), record.date, record.item, record.cost],
        )?,
    };

    Ok(())
}

/// Insert an income record.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn insert_income(
    user_id: UserID,
    date: Date,
    item: &str,
    cost: i64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO income (uid, date, item, cost) VALUES (?1, ?2, ?3, ?4)",
        params![user_id.as_i64(), date, item, cost],
    )?;

    Ok(())
}

fn sub_category_column(category: Category) -> Option<GroupColumn> {
    match category {
        Category::Food | Category::General => Some(GroupColumn::Category),
        Category::Holiday => Some(GroupColumn::Holiday),
        Category::Social => Some(GroupColumn::Society),
        Category::Bills | Category::Funds => None,
    }
}

/// Reads cost records from a shared SQLite connection.
#[derive(Debug, Clone)]
pub struct SQLiteAnalysisStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAnalysisStore {
    /// Create a store over `connection`.
    ///
    /// The caller should ensure the schema has been created with [initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Arc<Mutex<Connection>> {
        &self.connection
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

fn map_label_cost(row: &Row) -> Result<LabelCost, rusqlite::Error> {
    Ok(LabelCost {
        label: row.get(0)?,
        cost: row.get(1)?,
    })
}

impl AnalysisStore for SQLiteAnalysisStore {
    fn period_cost_rows(
        &self,
        user_id: UserID,
        category: Category,
        column: GroupColumn,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<LabelCost>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT {column} AS label, SUM(cost) AS total
                FROM {table}
                WHERE uid = ?1 AND date BETWEEN ?2 AND ?3 AND cost > 0
                GROUP BY label
                ORDER BY total DESC, label ASC
                LIMIT ?4",
                column = column.as_sql(),
                table = category.table_name(),
            ))?
            .query_map(
                params![user_id.as_i64(), range.start, range.end, limit],
                map_label_cost,
            )?
            .collect::<Result<Vec<_>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    fn deep_cost_rows(
        &self,
        user_id: UserID,
        category: Category,
        column: GroupColumn,
        range: DateRange,
    ) -> Result<Vec<DeepCostRow>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT item, {column} AS item_group, SUM(cost) AS total
                FROM {table}
                WHERE uid = ?1 AND date BETWEEN ?2 AND ?3 AND cost > 0
                GROUP BY item, item_group
                ORDER BY item_group ASC, total DESC, item ASC",
                column = column.as_sql(),
                table = category.table_name(),
            ))?
            .query_map(params![user_id.as_i64(), range.start, range.end], |row| {
                Ok(DeepCostRow {
                    item: row.get(0)?,
                    group: row.get(1)?,
                    cost: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    fn raw_records(
        &self,
        user_id: UserID,
        category: Category,
        range: DateRange,
    ) -> Result<Vec<CostRecord>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT date, cost FROM {table}
                WHERE uid = ?1 AND date BETWEEN ?2 AND ?3
                ORDER BY date ASC",
                table = category.table_name(),
            ))?
            .query_map(params![user_id.as_i64(), range.start, range.end], |row| {
                Ok(CostRecord {
                    date: row.get(0)?,
                    cost: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    fn income(&self, user_id: UserID, range: DateRange) -> Result<i64, Error> {
        let connection = self.lock()?;

        connection
            .query_row(
                "SELECT COALESCE(SUM(cost), 0) FROM income
                WHERE uid = ?1 AND date BETWEEN ?2 AND ?3",
                params![user_id.as_i64(), range.start, range.end],
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    fn pie_rows(
        &self,
        user_id: UserID,
        category: Category,
        pie_column: PieColumn,
        limit: u32,
    ) -> Result<Vec<LabelCost>, Error> {
        let column = pie_column.column.as_sql();
        let table = category.table_name();

        let query = match pie_column.kind {
            SegmentKind::Cost => format!(
                "SELECT {column} AS label, SUM(cost) AS total
                FROM {table}
                WHERE uid = ?1 AND cost > 0
                GROUP BY label
                ORDER BY total DESC, label ASC
                LIMIT ?2"
            ),
            SegmentKind::Int => format!(
                "SELECT label, COUNT(*) AS total FROM (
                    SELECT {column} AS label
                    FROM {table}
                    WHERE uid = ?1
                    GROUP BY date, label
                )
                GROUP BY label
                ORDER BY total DESC, label ASC
                LIMIT ?2"
            ),
        };

        let connection = self.lock()?;

        connection
            .prepare(&query)?
            .query_map(params![user_id.as_i64(), limit], map_label_cost)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }
}
