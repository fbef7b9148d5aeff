use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection};
use uuid::Uuid;

use wishr_core::models::item::{ItemId, ItemRecord};

// ── Helpers ──

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn fmt_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ── Wishlist items ──

/// All items, in insertion order.
pub fn list_items(conn: &Connection) -> anyhow::Result<Vec<ItemRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, url, date_added, is_bought, bought_by, purchase_date
         FROM wishlist_items ORDER BY position",
    )?;
    let rows = stmt.query_map([], row_to_record)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Replace the whole collection in one transaction.
pub fn replace_items(conn: &Connection, records: &[ItemRecord]) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM wishlist_items", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO wishlist_items (id, position, name, description, url, date_added, is_bought, bought_by, purchase_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (position, record) in records.iter().enumerate() {
            stmt.execute(params![
                record.id.0.to_string(),
                i64::try_from(position)?,
                record.name,
                record.description,
                record.url,
                fmt_date(&record.date_added),
                record.is_bought as i32,
                record.bought_by,
                record.purchase_date.as_ref().map(fmt_date),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ItemRecord> {
    let id_str: String = row.get(0)?;
    let date_added_str: String = row.get(4)?;
    let is_bought: i32 = row.get(5)?;
    let purchase_date_str: Option<String> = row.get(7)?;

    let id = Uuid::parse_str(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(ItemRecord {
        id: ItemId::from_uuid(id),
        name: row.get(1)?,
        description: row.get(2)?,
        url: row.get(3)?,
        date_added: parse_date(4, &date_added_str)?,
        is_bought: is_bought != 0,
        bought_by: row.get(6)?,
        purchase_date: purchase_date_str
            .map(|s| parse_date(7, &s))
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_memory_db;

    fn record(name: &str, bought_by: Option<&str>) -> ItemRecord {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        ItemRecord {
            id: ItemId::new(),
            name: name.to_string(),
            description: None,
            url: Some("https://example.com/ski".to_string()),
            date_added: day,
            is_bought: bought_by.is_some(),
            bought_by: bought_by.map(str::to_string),
            purchase_date: bought_by.map(|_| day),
        }
    }

    #[test]
    fn test_replace_and_list_keeps_order() {
        let conn = open_memory_db().unwrap();
        let records = vec![record("Ski", None), record("Boots", Some("Dad")), record("Hat", None)];
        replace_items(&conn, &records).unwrap();
        assert_eq!(list_items(&conn).unwrap(), records);

        let shorter = vec![records[2].clone(), records[0].clone()];
        replace_items(&conn, &shorter).unwrap();
        assert_eq!(list_items(&conn).unwrap(), shorter);
    }

    #[test]
    fn test_partial_purchase_rejected_and_rolled_back() {
        let conn = open_memory_db().unwrap();
        let good = record("Ski", None);
        replace_items(&conn, std::slice::from_ref(&good)).unwrap();

        let mut bad = record("Boots", Some("Dad"));
        bad.purchase_date = None;
        assert!(replace_items(&conn, &[bad]).is_err());
        assert_eq!(list_items(&conn).unwrap(), vec![good]);
    }

    #[test]
    fn test_bad_date_is_conversion_failure() {
        let conn = open_memory_db().unwrap();
        conn.execute(
            "INSERT INTO wishlist_items (id, position, name, date_added) VALUES (?1, 0, 'x', '17/05/2024')",
            params![Uuid::new_v4().to_string()],
        )
        .unwrap();
        let err = list_items(&conn).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::FromSqlConversionFailure(..))
        ));
    }
}
