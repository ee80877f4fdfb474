// src/services.rs

pub mod account_service;
pub mod auth;
pub mod chat_service;
pub mod dashboard_service;
pub mod document_service;
pub mod email_service;
pub mod onboarding_service;
