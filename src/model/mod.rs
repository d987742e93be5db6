pub mod category;
pub mod complaint;
pub mod language;

pub use category::Category;
pub use complaint::{ComplaintRecord, TicketStatus};
pub use language::Language;
