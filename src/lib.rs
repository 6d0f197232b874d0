//! MySQL Audit - account, privilege and server setting audit for MySQL.

pub mod audit;
pub mod config;
pub mod db;
pub mod display;
