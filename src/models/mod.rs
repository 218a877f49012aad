//! Data models for GymOps

pub mod dates;
pub mod enums;
pub mod equipment;
pub mod filter;
pub mod maintenance;
pub mod monthly_cost;
pub mod ticket;

// Re-export commonly used types
pub use enums::{EquipmentStatus, MaintenanceStatus, RaisedByType, TicketPriority, TicketStatus};
pub use equipment::Equipment;
pub use filter::{FilterCriteria, FilterValue};
pub use maintenance::MaintenanceSchedule;
pub use monthly_cost::MonthlyCost;
pub use ticket::Ticket;
