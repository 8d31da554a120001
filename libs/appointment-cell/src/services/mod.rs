pub mod availability;
pub mod booking;
pub mod slots;
pub mod stats;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use slots::SlotService;
pub use stats::StatsService;
