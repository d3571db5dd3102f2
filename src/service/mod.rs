//! Service layer: business logic orchestration.
//!
//! [`GeoService`] runs entity operations against the store and hands every
//! write outcome to the [`Notifier`], which broadcasts it through the
//! [`super::domain::ConnectionRegistry`].

pub mod geo_service;
pub mod notifier;

pub use geo_service::GeoService;
pub use notifier::Notifier;
