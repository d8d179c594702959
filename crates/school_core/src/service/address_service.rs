//! Address use-case service.
//!
//! Deleting an address leaves its student in place with no address.

use crate::config::SchoolConfig;
use crate::mapper::{address_to_record, addresses_to_records, record_to_address, AddressRecord};
use crate::model::address::{Address, AddressId};
use crate::model::EntityKind;
use crate::repo::SchoolRepository;
use crate::service::error::{non_empty, ServiceError, ServiceResult};
use log::info;

/// Address service facade.
pub struct AddressService<R: SchoolRepository> {
    repo: R,
    config: SchoolConfig,
}

impl<R: SchoolRepository> AddressService<R> {
    pub fn new(repo: R, config: SchoolConfig) -> Self {
        Self { repo, config }
    }

    pub fn list_addresses(&self) -> ServiceResult<Vec<AddressRecord>> {
        let addresses = non_empty(
            self.config.empty_list,
            EntityKind::Address,
            self.repo.find_all_addresses()?,
        )?;
        Ok(addresses_to_records(&addresses))
    }

    pub fn get_address(&self, id: AddressId) -> ServiceResult<AddressRecord> {
        Ok(address_to_record(&self.find_address_by_id(id)?))
    }

    pub fn find_address_by_id(&self, id: AddressId) -> ServiceResult<Address> {
        self.repo
            .find_address_by_id(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::Address,
                id,
            })
    }

    /// Creates an address; `record.id` is ignored.
    pub fn create_address(&self, record: &AddressRecord) -> ServiceResult<AddressRecord> {
        let mut address = record_to_address(record);
        address.id = None;
        let saved = self.repo.in_transaction(|| -> ServiceResult<Address> {
            Ok(self.repo.save_address(&address)?)
        })?;
        info!(
            "event=address_create module=service status=ok address_id={}",
            saved.id.unwrap_or_default()
        );
        Ok(address_to_record(&saved))
    }

    pub fn update_address(
        &self,
        record: &AddressRecord,
        id: AddressId,
    ) -> ServiceResult<AddressRecord> {
        let saved = self.repo.in_transaction(|| -> ServiceResult<Address> {
            let mut address = self.find_address_by_id(id)?;
            address.street = record.street.clone();
            address.city = record.city.clone();
            address.country = record.country.clone();
            Ok(self.repo.save_address(&address)?)
        })?;
        info!("event=address_update module=service status=ok address_id={id}");
        Ok(address_to_record(&saved))
    }

    pub fn delete_address(&self, id: AddressId) -> ServiceResult<String> {
        self.repo.in_transaction(|| -> ServiceResult<()> {
            self.find_address_by_id(id)?;
            Ok(self.repo.delete_address_by_id(id)?)
        })?;
        info!("event=address_delete module=service status=ok address_id={id}");
        Ok(format!("Address with id = {id} Deleted...."))
    }

    pub fn number_of_students(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_students()?)
    }
}
