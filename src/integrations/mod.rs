// src/integrations/mod.rs
//
// External service adapters. Each one implements a crate-side trait and
// never touches domain state.

pub mod mailjet;

pub use mailjet::{MailjetClient, MailjetSender};
