//! External concerns: database and MQTT broker client.

pub mod database;
pub mod mqtt;

pub use database::{init_database, DatabaseConfig};
pub use mqtt::{CommandPublisher, MqttConfig, MqttError, MqttPublisher};
