//! Background [`Task`]s definitions.

mod background;
pub mod deliver_leads;

pub use common::Handler as Task;

pub use self::{background::Background, deliver_leads::DeliverLeads};
