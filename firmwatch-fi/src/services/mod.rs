//! Pipeline components

pub mod delivery_client;
pub mod file_scanner;
pub mod lot_parser;
pub mod orchestrator;

pub use delivery_client::{DeliveryClient, DeliveryError, DeliveryReceipt};
pub use file_scanner::{FileScanner, ScanError};
pub use lot_parser::ParseError;
pub use orchestrator::Orchestrator;
