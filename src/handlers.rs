// src/handlers.rs

pub mod account;
pub mod admin;
pub mod auth;
pub mod chat;
pub mod clients;
pub mod dashboard;
pub mod modules;
pub mod onboarding;
