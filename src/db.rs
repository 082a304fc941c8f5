pub mod tables;
pub mod query;

pub mod contract_repo;
pub use contract_repo::ContractRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod agenda_repo;
pub use agenda_repo::AgendaRepository;

#[cfg(test)]
pub mod memory;
