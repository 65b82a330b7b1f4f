mod config;
mod convert;
