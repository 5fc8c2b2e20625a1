pub mod describe;
pub mod reader;
pub mod row;
pub mod sheets;

pub use describe::describe;
pub use reader::from_csv;
pub use row::{Dataset, Row};
pub use sheets::SheetsClient;
