mod page;
pub use self::page::PricePage;

mod record;
pub use self::record::{display_value, Record};
