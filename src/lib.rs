pub mod access;
pub mod app;
pub mod auth;
pub mod blocks;
pub mod config;
pub mod editor;
pub mod error;
pub mod pages;
pub mod seed;
pub mod sites;
pub mod state;
