pub mod form;
pub mod records;

pub use form::FormScreen;
pub use records::RecordsScreen;
