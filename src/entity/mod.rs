pub mod audit_logs;
pub mod chat_messages;
pub mod products;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use chat_messages::Entity as ChatMessages;
pub use products::Entity as Products;
pub use users::Entity as Users;
