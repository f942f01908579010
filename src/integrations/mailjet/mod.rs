pub mod client;

pub use client::{MailjetClient, MailjetSender};
