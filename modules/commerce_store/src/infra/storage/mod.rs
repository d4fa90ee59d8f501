//! Storage layer - database entities, mappers, repositories and the unit of work

pub(crate) mod context;
pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod record;
pub mod repository;
pub mod unit_of_work;

pub use record::Record;
pub use repository::SeaOrmRepository;
pub use unit_of_work::UnitOfWork;
