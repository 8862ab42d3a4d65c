use crate::error::{Result, StoreError};
use crate::property::{PropertyDictionary, PropertyListStorage, PropertyValue};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// One named property list inside the database.
pub struct PropertyListRepo<'a> {
    conn: &'a Connection,
    name: String,
}

impl<'a> PropertyListRepo<'a> {
    pub fn new(conn: &'a Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exists(&self) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM property_lists WHERE name = ?1;",
                [&self.name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn not_found(&self) -> StoreError {
        StoreError::NotFound(format!("property list {}", self.name))
    }

    /// One empty dictionary per stored item. Positions must run 0, 1, 2, ...
    fn load_items(&self) -> Result<Vec<PropertyDictionary>> {
        let mut stmt = self.conn.prepare(
            "SELECT position FROM property_list_items
             WHERE list_name = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([&self.name])?;
        let mut list = Vec::new();
        while let Some(row) = rows.next()? {
            let position: i64 = row.get(0)?;
            if usize::try_from(position).ok() != Some(list.len()) {
                return Err(StoreError::CorruptProperty(format!(
                    "item position {position} where {} was expected",
                    list.len()
                )));
            }
            list.push(PropertyDictionary::new());
        }
        Ok(list)
    }

    fn clear(&self, tx: &Transaction<'_>) -> Result<usize> {
        tx.execute(
            "DELETE FROM property_list_values WHERE list_name = ?1;",
            [&self.name],
        )?;
        tx.execute(
            "DELETE FROM property_list_items WHERE list_name = ?1;",
            [&self.name],
        )?;
        let removed = tx.execute("DELETE FROM property_lists WHERE name = ?1;", [&self.name])?;
        Ok(removed)
    }
}

impl PropertyListStorage for PropertyListRepo<'_> {
    fn load(&self) -> Result<Vec<PropertyDictionary>> {
        if !self.exists()? {
            return Err(self.not_found());
        }
        let mut list = self.load_items()?;

        let mut stmt = self.conn.prepare(
            "SELECT position, key, kind, value
             FROM property_list_values
             WHERE list_name = ?1
             ORDER BY position ASC, key ASC;",
        )?;
        let mut rows = stmt.query([&self.name])?;
        while let Some(row) = rows.next()? {
            let position: i64 = row.get(0)?;
            let key: String = row.get(1)?;
            let kind: String = row.get(2)?;
            let raw: Value = row.get(3)?;
            let slot = usize::try_from(position)
                .ok()
                .and_then(|index| list.get_mut(index))
                .ok_or_else(|| {
                    StoreError::CorruptProperty(format!("value at missing position {position}"))
                })?;
            slot.insert(key, value_from_sql(&kind, raw)?);
        }

        Ok(list)
    }

    fn save(&self, list: &[PropertyDictionary]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.clear(&tx)?;
        tx.execute("INSERT INTO property_lists (name) VALUES (?1);", [&self.name])?;

        {
            let mut item_stmt = tx.prepare(
                "INSERT INTO property_list_items (list_name, position) VALUES (?1, ?2);",
            )?;
            let mut value_stmt = tx.prepare(
                "INSERT INTO property_list_values (list_name, position, key, kind, value)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, dictionary) in list.iter().enumerate() {
                let position = position as i64;
                item_stmt.execute(params![self.name, position])?;
                for (key, value) in dictionary {
                    value_stmt.execute(params![
                        self.name,
                        position,
                        key,
                        value.kind(),
                        value_to_sql(value)
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        if self.clear(&tx)? == 0 {
            return Err(self.not_found());
        }
        tx.commit()?;
        Ok(())
    }
}

fn value_to_sql(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::String(text) => Value::Text(text.clone()),
        PropertyValue::Integer(number) => Value::Integer(*number),
        PropertyValue::Bool(flag) => Value::Integer(i64::from(*flag)),
        PropertyValue::Date(date) => Value::Text(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

fn value_from_sql(kind: &str, raw: Value) -> Result<PropertyValue> {
    match (kind, raw) {
        ("string", Value::Text(text)) => Ok(PropertyValue::String(text)),
        ("integer", Value::Integer(number)) => Ok(PropertyValue::Integer(number)),
        ("bool", Value::Integer(number)) => Ok(PropertyValue::Bool(number != 0)),
        ("date", Value::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|date| PropertyValue::Date(date.with_timezone(&Utc)))
            .map_err(|_| StoreError::CorruptProperty(format!("invalid date: {text}"))),
        (kind, raw) => Err(StoreError::CorruptProperty(format!(
            "unexpected {kind} value: {raw:?}"
        ))),
    }
}
