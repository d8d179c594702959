//! Address repository contract and SQLite implementation.

use crate::model::address::{Address, AddressId};
use crate::model::EntityKind;
use crate::repo::store::{RepoError, RepoResult, SqliteSchoolRepository};
use rusqlite::{params, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    street,
    city,
    country
FROM addresses";

/// Repository interface for address records.
pub trait AddressRepository {
    fn find_all_addresses(&self) -> RepoResult<Vec<Address>>;
    fn find_address_by_id(&self, id: AddressId) -> RepoResult<Option<Address>>;
    /// Inserts when `address.id` is `None`, otherwise updates.
    fn save_address(&self, address: &Address) -> RepoResult<Address>;
    /// Deletes the address; students pointing at it lose their reference.
    fn delete_address_by_id(&self, id: AddressId) -> RepoResult<()>;
}

impl AddressRepository for SqliteSchoolRepository<'_> {
    fn find_all_addresses(&self) -> RepoResult<Vec<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut addresses = Vec::new();
        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }
        Ok(addresses)
    }

    fn find_address_by_id(&self, id: AddressId) -> RepoResult<Option<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_address_row(row)?));
        }
        Ok(None)
    }

    fn save_address(&self, address: &Address) -> RepoResult<Address> {
        let id = match address.id {
            None => {
                self.conn.execute(
                    "INSERT INTO addresses (street, city, country) VALUES (?1, ?2, ?3);",
                    params![
                        address.street.as_str(),
                        address.city.as_str(),
                        address.country.as_str(),
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE addresses
                     SET
                        street = ?2,
                        city = ?3,
                        country = ?4
                     WHERE id = ?1;",
                    params![
                        id,
                        address.street.as_str(),
                        address.city.as_str(),
                        address.country.as_str(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::Address,
                        id,
                    });
                }
                id
            }
        };

        let mut saved = address.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn delete_address_by_id(&self, id: AddressId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM addresses WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Address,
                id,
            });
        }
        Ok(())
    }
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    Ok(Address {
        id: Some(row.get("id")?),
        street: row.get("street")?,
        city: row.get("city")?,
        country: row.get("country")?,
    })
}
