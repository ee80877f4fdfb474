// src/models.rs

pub mod account;
pub mod auth;
pub mod chat;
pub mod client;
pub mod dashboard;
pub mod modules;
pub mod onboarding;
