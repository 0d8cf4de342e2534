/// Habit creation, lookup, update, and deletion
pub mod habit;
/// Periodicity records and their textual form
pub mod periodicity;
/// Scanning for due habits and sending reminders
pub mod reminder;
/// Validation rules shared by every habit write
pub mod rules;
/// User registration and contact details
pub mod user;
