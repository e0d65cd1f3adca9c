pub mod repository;
pub mod uploads;

pub use repository::DieselRepository;
pub use uploads::ImageStore;
