pub mod auth;
pub mod contract_service;
pub mod inventory_service;
pub mod agenda_service;
pub mod installation_service;
pub mod contract_templates;
pub mod document_service;
