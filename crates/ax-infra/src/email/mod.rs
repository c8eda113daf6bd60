mod sendgrid;
pub mod template;

pub use sendgrid::{EmailSender, SendGridMailer};
