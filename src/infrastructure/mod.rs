// Infrastructure layer - External dependencies and adapters
pub mod chart_mapper;
pub mod chunked_json;
pub mod config;
pub mod csv_repository;
pub mod json_response;
