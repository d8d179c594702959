//! Address <-> record copies.

use crate::mapper::record::AddressRecord;
use crate::model::address::Address;

pub fn address_to_record(address: &Address) -> AddressRecord {
    AddressRecord {
        id: address.id,
        street: address.street.clone(),
        city: address.city.clone(),
        country: address.country.clone(),
    }
}

pub fn record_to_address(record: &AddressRecord) -> Address {
    Address {
        id: record.id,
        street: record.street.clone(),
        city: record.city.clone(),
        country: record.country.clone(),
    }
}

pub fn addresses_to_records(addresses: &[Address]) -> Vec<AddressRecord> {
    addresses.iter().map(address_to_record).collect()
}
