/// Date parsing for user-entered dates
pub mod dates;
/// Project invitations stored per recipient
pub mod invitation;
/// Key-value persistence capability
pub mod kv;
/// Project membership lists and the membership index
pub mod membership;
/// Notification feed derivation
pub mod notification;
/// Payment records
pub mod payment;
/// Creator contract profiles
pub mod profile;
/// Negotiation project records
pub mod project;
/// Text reports for the command line
pub mod report;
/// Payment eligibility and due dates
pub mod schedule;
/// Uploaded video records
pub mod video;
