pub mod driver;
pub mod error;
pub mod page;
pub mod result;
pub mod scanner;

pub use driver::WebDriverPage;
pub use error::ScanError;
pub use page::{ElementSnapshot, PageDriver};
pub use result::{Item, NavigationScan, Section};
pub use scanner::{DEFAULT_ITEM_PATTERN, DEFAULT_SECTION_TEMPLATE, MenuScanner};
